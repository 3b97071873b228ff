use crate::backend::{BackendError, GraphicsBackend};
use crate::device::{DeviceEvent, GraphicsApi, HostGraphics};
use crate::staging::{Mat4, PointXYZW, VertexStream};

use super::commands::{GlCommands, RenderState, ShaderStage};
use super::shaders;

/// Storage binding point of the position stream.
pub const POSITION_BINDING: u32 = 1;
/// Storage binding point of the color stream.
pub const COLOR_BINDING: u32 = 2;

type Connect<G> = Box<dyn FnMut() -> Result<G, BackendError>>;

struct MeshProgram<G: GlCommands> {
    program: G::Program,
    mesh: G::Shader,
    fragment: G::Shader,
    projection: Option<G::Uniform>,
    view: Option<G::Uniform>,
    model: Option<G::Uniform>,
}

struct StorageBuffers<G: GlCommands> {
    position: G::Buffer,
    color: G::Buffer,
    positions: VertexStream,
    colors: VertexStream,
    vertex_count: usize,
}

/// Draws staged points with an `NV_mesh_shader` program.
///
/// GL is reached through `connect`, called on each device Initialize while
/// the host's context is current. The program is built once per device; the
/// storage buffers are sized by `initialize_storage_buffers` and refilled in
/// full on every draw.
pub struct MeshShaderBackend<G: GlCommands> {
    api: GraphicsApi,
    connect: Connect<G>,
    gl: Option<G>,
    program: Option<MeshProgram<G>>,
    storage: Option<StorageBuffers<G>>,
}

impl<G: GlCommands> MeshShaderBackend<G> {
    pub fn new(api: GraphicsApi, connect: impl FnMut() -> Result<G, BackendError> + 'static) -> Self {
        Self {
            api,
            connect: Box::new(connect),
            gl: None,
            program: None,
            storage: None,
        }
    }

    /// Bytes allocated for each storage buffer, `None` before initialization.
    pub fn storage_bytes(&self) -> Option<usize> {
        self.storage
            .as_ref()
            .map(|s| s.vertex_count * PointXYZW::SIZE)
    }

    pub fn has_program(&self) -> bool {
        self.program.is_some()
    }

    fn create_resources(&mut self) -> Result<(), BackendError> {
        self.release_resources();

        if self.gl.is_none() {
            self.gl = Some((self.connect)()?);
        }
        let Some(gl) = self.gl.as_mut() else {
            return Err(BackendError::ProgramNotInitialized);
        };

        let mesh = gl.compile_shader(ShaderStage::Mesh, shaders::MESH_SHADER)?;
        let fragment = match gl.compile_shader(ShaderStage::Fragment, shaders::FRAGMENT_SHADER) {
            Ok(fragment) => fragment,
            Err(err) => {
                gl.delete_shader(mesh);
                return Err(err);
            }
        };
        let program = match gl.link_program(&[mesh, fragment]) {
            Ok(program) => program,
            Err(err) => {
                gl.delete_shader(mesh);
                gl.delete_shader(fragment);
                return Err(err);
            }
        };

        let projection = gl.uniform_location(program, shaders::PROJECTION_UNIFORM);
        let view = gl.uniform_location(program, shaders::VIEW_UNIFORM);
        let model = gl.uniform_location(program, shaders::MODEL_UNIFORM);
        if projection.is_none() || view.is_none() || model.is_none() {
            log::warn!("mesh program is missing a transform uniform; points may not be transformed");
        }

        self.program = Some(MeshProgram {
            program,
            mesh,
            fragment,
            projection,
            view,
            model,
        });
        log::debug!("mesh program linked for {:?}", self.api);
        Ok(())
    }

    fn release_storage(&mut self) {
        if let (Some(gl), Some(storage)) = (self.gl.as_mut(), self.storage.take()) {
            gl.delete_buffer(storage.position);
            gl.delete_buffer(storage.color);
        }
    }

    fn release_resources(&mut self) {
        self.release_storage();
        if let (Some(gl), Some(program)) = (self.gl.as_mut(), self.program.take()) {
            gl.delete_program(program.program);
            gl.delete_shader(program.mesh);
            gl.delete_shader(program.fragment);
        }
    }
}

impl<G: GlCommands> GraphicsBackend for MeshShaderBackend<G> {
    fn api(&self) -> GraphicsApi {
        self.api
    }

    fn process_device_event(
        &mut self,
        event: DeviceEvent,
        _host: &dyn HostGraphics,
    ) -> Result<(), BackendError> {
        match event {
            DeviceEvent::Initialize => self.create_resources(),
            DeviceEvent::Shutdown => {
                self.release_resources();
                self.gl = None;
                Ok(())
            }
            other => {
                log::debug!("mesh backend ignores device event {other:?}");
                Ok(())
            }
        }
    }

    fn initialize_storage_buffers(
        &mut self,
        positions: VertexStream,
        colors: VertexStream,
        vertex_count: usize,
    ) -> Result<(), BackendError> {
        self.release_storage();

        let gl = self.gl.as_mut().ok_or(BackendError::ProgramNotInitialized)?;
        let bytes = vertex_count * PointXYZW::SIZE;

        let position = gl.create_storage_buffer(bytes)?;
        let color = match gl.create_storage_buffer(bytes) {
            Ok(color) => color,
            Err(err) => {
                gl.delete_buffer(position);
                return Err(err);
            }
        };

        log::debug!("storage buffers allocated: {vertex_count} records, {bytes} bytes each");
        self.storage = Some(StorageBuffers {
            position,
            color,
            positions,
            colors,
            vertex_count,
        });
        Ok(())
    }

    fn draw_mesh_shader(
        &mut self,
        projection: &Mat4,
        view: &Mat4,
        model: &Mat4,
        point_size: f32,
        workgroups: u32,
    ) -> Result<(), BackendError> {
        let (Some(gl), Some(program)) = (self.gl.as_mut(), self.program.as_ref()) else {
            return Err(BackendError::ProgramNotInitialized);
        };
        let storage = self.storage.as_ref().ok_or(BackendError::BuffersNotInitialized)?;

        gl.apply_render_state(&RenderState::points(point_size));
        gl.use_program(program.program);

        gl.uniform_matrix4(program.projection.as_ref(), projection);
        gl.uniform_matrix4(program.view.as_ref(), view);
        gl.uniform_matrix4(program.model.as_ref(), model);

        gl.upload_storage_buffer(
            storage.position,
            storage.positions.prefix_bytes(storage.vertex_count),
            POSITION_BINDING,
        );
        gl.upload_storage_buffer(
            storage.color,
            storage.colors.prefix_bytes(storage.vertex_count),
            COLOR_BINDING,
        );

        gl.draw_mesh_tasks(0, workgroups);
        Ok(())
    }

    fn poll_error(&mut self) -> u32 {
        self.gl.as_mut().map_or(0, |gl| gl.last_error())
    }
}

impl<G: GlCommands> Drop for MeshShaderBackend<G> {
    fn drop(&mut self) {
        // Without a Shutdown there is no guarantee the context is still current.
        if self.program.is_some() || self.storage.is_some() {
            log::warn!(
                "{:?} mesh backend dropped with live GL objects; they are left to the context",
                self.api
            );
        }
    }
}
