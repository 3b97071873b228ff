use crate::device::{DeviceEvent, GraphicsApi, HostGraphics};
use crate::staging::{Mat4, VertexStream};

use super::{BackendError, GraphicsBackend};

/// Backend for APIs that have a slot in the factory but no draw path yet.
///
/// Accepts the full lifecycle and every operation, issuing no GPU work. The
/// render dispatcher never routes buffer or draw work here; direct callers
/// get a one-time debug message.
#[derive(Debug)]
pub struct StubBackend {
    api: GraphicsApi,
    warned: bool,
}

impl StubBackend {
    pub fn new(api: GraphicsApi) -> Self {
        Self { api, warned: false }
    }

    fn note_ignored(&mut self, what: &str) {
        if !self.warned {
            log::debug!("{:?} backend has no {what} implementation; ignored", self.api);
            self.warned = true;
        }
    }
}

impl GraphicsBackend for StubBackend {
    fn api(&self) -> GraphicsApi {
        self.api
    }

    fn process_device_event(
        &mut self,
        event: DeviceEvent,
        _host: &dyn HostGraphics,
    ) -> Result<(), BackendError> {
        log::debug!("{:?} backend: device event {event:?}", self.api);
        Ok(())
    }

    fn initialize_storage_buffers(
        &mut self,
        _positions: VertexStream,
        _colors: VertexStream,
        _vertex_count: usize,
    ) -> Result<(), BackendError> {
        self.note_ignored("storage buffer");
        Ok(())
    }

    fn draw_mesh_shader(
        &mut self,
        _projection: &Mat4,
        _view: &Mat4,
        _model: &Mat4,
        _point_size: f32,
        _workgroups: u32,
    ) -> Result<(), BackendError> {
        self.note_ignored("mesh shader");
        Ok(())
    }
}
