//! Device lifecycle handling.
//!
//! This module is responsible for:
//! - identifying the host's active graphics API
//! - decoding device lifecycle events
//! - creating and destroying the active backend as the device comes and goes

mod api;
mod error;
mod event;
mod host;
mod router;

pub use api::GraphicsApi;
pub use error::RouterError;
pub use event::DeviceEvent;
pub use host::HostGraphics;
pub use router::DeviceRouter;
