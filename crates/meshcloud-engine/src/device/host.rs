use super::GraphicsApi;

/// The engine's view of the host's graphics interface.
///
/// The plugin crate implements this over the host registry; tests can use a
/// bare [`GraphicsApi`], which reports itself.
pub trait HostGraphics {
    /// Graphics API of the device the host is currently running.
    fn renderer(&self) -> GraphicsApi;
}

impl HostGraphics for GraphicsApi {
    fn renderer(&self) -> GraphicsApi {
        *self
    }
}
