//! Plugin state as an explicit value.
//!
//! [`PluginContext`] holds what a native plugin would otherwise keep in
//! globals: the staged frame, the device router and the debug channel back to
//! the host. The C ABI layer owns exactly one and forwards every entry point
//! to it.

mod context;
mod debug;

pub use context::PluginContext;
pub use debug::DebugChannel;
