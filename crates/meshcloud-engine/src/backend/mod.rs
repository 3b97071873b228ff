//! Graphics backends.
//!
//! A backend owns the GPU objects for one native graphics API and performs
//! the two pieces of GPU work this crate knows: allocating the vertex storage
//! buffers and drawing them with a mesh shader. Exactly one backend is alive
//! per device; [`crate::device::DeviceRouter`] creates it on device
//! initialization through a [`BackendFactory`] and drops it on shutdown.
//!
//! Backends:
//! - [`opengl::MeshShaderBackend`] for the OpenGL core / ES family
//! - [`StubBackend`] for Direct3D 11/12, Metal and Vulkan
//!
//! Every other API gets no backend at all.

mod error;
pub mod opengl;
mod stub;

pub use error::BackendError;
pub use stub::StubBackend;

use crate::device::{DeviceEvent, GraphicsApi, HostGraphics};
use crate::staging::{Mat4, VertexStream};

use opengl::{GlowCommands, MeshShaderBackend, ProcLoader};

/// Capabilities every graphics backend provides.
pub trait GraphicsBackend {
    /// API this backend was created for.
    fn api(&self) -> GraphicsApi;

    /// Handles a device lifecycle transition.
    ///
    /// Initialize must leave every GPU object the backend needs created;
    /// Shutdown must release them. Other events are no-ops unless a backend
    /// has a reason to react.
    fn process_device_event(
        &mut self,
        event: DeviceEvent,
        host: &dyn HostGraphics,
    ) -> Result<(), BackendError>;

    /// (Re)allocates the position and color storage buffers for
    /// `vertex_count` records each and keeps the streams for later draws.
    fn initialize_storage_buffers(
        &mut self,
        positions: VertexStream,
        colors: VertexStream,
        vertex_count: usize,
    ) -> Result<(), BackendError>;

    /// Submits one full draw. Both storage buffers are re-uploaded from the
    /// retained streams on every call. Returns after submission, not
    /// completion.
    fn draw_mesh_shader(
        &mut self,
        projection: &Mat4,
        view: &Mat4,
        model: &Mat4,
        point_size: f32,
        workgroups: u32,
    ) -> Result<(), BackendError>;

    /// Latest native error code, `0` when there is none.
    fn poll_error(&mut self) -> u32 {
        0
    }
}

/// Constructs the backend for a graphics API, or `None` if unsupported.
pub trait BackendFactory {
    fn create(&mut self, api: GraphicsApi) -> Option<Box<dyn GraphicsBackend>>;
}

impl<T> BackendFactory for T
where
    T: FnMut(GraphicsApi) -> Option<Box<dyn GraphicsBackend>>,
{
    fn create(&mut self, api: GraphicsApi) -> Option<Box<dyn GraphicsBackend>> {
        self(api)
    }
}

/// Stub backend for APIs with a factory slot but no draw path.
pub fn stub_for(api: GraphicsApi) -> Option<Box<dyn GraphicsBackend>> {
    match api {
        GraphicsApi::Direct3D11
        | GraphicsApi::Direct3D12
        | GraphicsApi::Metal
        | GraphicsApi::Vulkan => Some(Box::new(StubBackend::new(api))),
        _ => None,
    }
}

/// Default factory: picks the backend for `api`.
///
/// The OpenGL backend resolves GL entry points through `loader` only when its
/// device initializes, never here.
pub fn create_backend(api: GraphicsApi, loader: &ProcLoader) -> Option<Box<dyn GraphicsBackend>> {
    if api.is_opengl() {
        let loader = loader.clone();
        let backend = MeshShaderBackend::new(api, move || {
            // SAFETY: called from device Initialize, where the host guarantees
            // its GL context is current on this thread for the device lifetime.
            unsafe { GlowCommands::load(&*loader) }
        });
        return Some(Box::new(backend));
    }
    stub_for(api)
}

/// [`BackendFactory`] backed by the platform GL loader.
pub struct NativeFactory {
    loader: Option<ProcLoader>,
}

impl NativeFactory {
    pub fn new(loader: ProcLoader) -> Self {
        Self { loader: Some(loader) }
    }

    /// Factory for a process where no GL library could be opened; OpenGL
    /// devices then get no backend.
    pub fn without_gl() -> Self {
        Self { loader: None }
    }
}

impl BackendFactory for NativeFactory {
    fn create(&mut self, api: GraphicsApi) -> Option<Box<dyn GraphicsBackend>> {
        match &self.loader {
            Some(loader) => create_backend(api, loader),
            None if api.is_opengl() => {
                log::warn!("no GL loader available; {api:?} device runs without a backend");
                None
            }
            None => stub_for(api),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;

    fn panicking_loader() -> ProcLoader {
        Rc::new(|name: &str| -> *const std::ffi::c_void {
            panic!("loader must not be called at construction (asked for {name})")
        })
    }

    #[test]
    fn supported_apis_get_a_backend() {
        let loader = panicking_loader();
        for api in [
            GraphicsApi::OpenGLCore,
            GraphicsApi::OpenGLES20,
            GraphicsApi::OpenGLES30,
            GraphicsApi::Direct3D11,
            GraphicsApi::Direct3D12,
            GraphicsApi::Metal,
            GraphicsApi::Vulkan,
        ] {
            let backend = create_backend(api, &loader).expect("supported api");
            assert_eq!(backend.api(), api);
        }
    }

    #[test]
    fn unsupported_apis_get_none() {
        let loader = panicking_loader();
        for api in [
            GraphicsApi::Null,
            GraphicsApi::PlayStation4,
            GraphicsApi::XboxOne,
            GraphicsApi::Nvn,
            GraphicsApi::XboxOneD3D12,
            GraphicsApi::Unknown(42),
        ] {
            assert!(create_backend(api, &loader).is_none(), "{api:?} must be unsupported");
        }
    }

    #[test]
    fn factory_without_gl_skips_opengl_only() {
        let mut factory = NativeFactory::without_gl();
        assert!(factory.create(GraphicsApi::OpenGLCore).is_none());
        assert!(factory.create(GraphicsApi::Vulkan).is_some());
    }
}
