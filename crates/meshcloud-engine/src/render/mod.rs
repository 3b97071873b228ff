//! Render event handling.
//!
//! The host schedules opaque integer events on its render thread; this module
//! decodes them and maps them onto backend operations.

mod dispatcher;
mod error;
mod event;

pub use dispatcher::RenderDispatcher;
pub use error::DispatchError;
pub use event::PluginEvent;
