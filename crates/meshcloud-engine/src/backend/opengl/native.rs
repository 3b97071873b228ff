use std::ffi::c_void;
use std::rc::Rc;

use glow::HasContext;

use crate::backend::BackendError;
use crate::staging::Mat4;

use super::commands::{GlCommands, RenderState, ShaderStage};

/// Resolves a GL entry point by name; returns null when it is unavailable.
pub type ProcLoader = Rc<dyn Fn(&str) -> *const c_void>;

type DrawMeshTasksNv = unsafe extern "system" fn(first: u32, count: u32);
type PointSize = unsafe extern "system" fn(size: f32);

/// [`GlCommands`] over the host's current GL context.
pub struct GlowCommands {
    gl: glow::Context,
    draw_mesh_tasks_nv: DrawMeshTasksNv,
    point_size: PointSize,
}

impl GlowCommands {
    /// Loads GL for the context current on the calling thread.
    ///
    /// # Safety
    ///
    /// A GL context must be current on the calling thread, and the same
    /// context must be current on every thread that later issues commands
    /// through the returned value. Pointers returned by `loader` must be the
    /// entry points of that context.
    pub unsafe fn load(loader: &dyn Fn(&str) -> *const c_void) -> Result<Self, BackendError> {
        // glow queries the context version while loading; refuse early instead
        // of calling through a null pointer.
        if loader("glGetString").is_null() {
            return Err(BackendError::MissingEntryPoint("glGetString"));
        }

        let draw_mesh_tasks = loader("glDrawMeshTasksNV");
        if draw_mesh_tasks.is_null() {
            return Err(BackendError::MissingEntryPoint("glDrawMeshTasksNV"));
        }
        let point_size = loader("glPointSize");
        if point_size.is_null() {
            return Err(BackendError::MissingEntryPoint("glPointSize"));
        }

        // SAFETY: entry points come from the current context per the caller's contract,
        // and the signatures match the GL registry.
        let (gl, draw_mesh_tasks_nv, point_size) = unsafe {
            (
                glow::Context::from_loader_function(|name| loader(name)),
                std::mem::transmute::<*const c_void, DrawMeshTasksNv>(draw_mesh_tasks),
                std::mem::transmute::<*const c_void, PointSize>(point_size),
            )
        };

        log::info!("GL context loaded: {:?}", gl.version());

        Ok(Self {
            gl,
            draw_mesh_tasks_nv,
            point_size,
        })
    }
}

// SAFETY (all methods below): `load` requires the context to stay current for
// every call made through this value, and all handles passed in were created
// by the same context.
impl GlCommands for GlowCommands {
    type Shader = glow::Shader;
    type Program = glow::Program;
    type Buffer = glow::Buffer;
    type Uniform = glow::UniformLocation;

    fn compile_shader(
        &mut self,
        stage: ShaderStage,
        source: &str,
    ) -> Result<Self::Shader, BackendError> {
        unsafe {
            let shader = self
                .gl
                .create_shader(stage.gl_enum())
                .map_err(BackendError::ResourceCreation)?;
            self.gl.shader_source(shader, source);
            self.gl.compile_shader(shader);

            if !self.gl.get_shader_compile_status(shader) {
                let log = self.gl.get_shader_info_log(shader);
                self.gl.delete_shader(shader);
                return Err(BackendError::Compile { stage, log });
            }
            Ok(shader)
        }
    }

    fn link_program(&mut self, shaders: &[Self::Shader]) -> Result<Self::Program, BackendError> {
        unsafe {
            let program = self
                .gl
                .create_program()
                .map_err(BackendError::ResourceCreation)?;
            for shader in shaders {
                self.gl.attach_shader(program, *shader);
            }
            self.gl.link_program(program);

            if !self.gl.get_program_link_status(program) {
                let log = self.gl.get_program_info_log(program);
                self.gl.delete_program(program);
                return Err(BackendError::Link(log));
            }
            Ok(program)
        }
    }

    fn uniform_location(&mut self, program: Self::Program, name: &str) -> Option<Self::Uniform> {
        unsafe { self.gl.get_uniform_location(program, name) }
    }

    fn create_storage_buffer(&mut self, bytes: usize) -> Result<Self::Buffer, BackendError> {
        let size = i32::try_from(bytes).map_err(|_| {
            BackendError::ResourceCreation(format!("storage buffer of {bytes} bytes exceeds GL limits"))
        })?;
        unsafe {
            let buffer = self
                .gl
                .create_buffer()
                .map_err(BackendError::ResourceCreation)?;
            self.gl.bind_buffer(glow::SHADER_STORAGE_BUFFER, Some(buffer));
            self.gl
                .buffer_data_size(glow::SHADER_STORAGE_BUFFER, size, glow::STATIC_DRAW);
            self.gl.bind_buffer(glow::SHADER_STORAGE_BUFFER, None);
            Ok(buffer)
        }
    }

    fn upload_storage_buffer(&mut self, buffer: Self::Buffer, data: &[u8], binding: u32) {
        unsafe {
            self.gl.bind_buffer(glow::SHADER_STORAGE_BUFFER, Some(buffer));
            self.gl
                .buffer_data_u8_slice(glow::SHADER_STORAGE_BUFFER, data, glow::STATIC_DRAW);
            self.gl
                .bind_buffer_base(glow::SHADER_STORAGE_BUFFER, binding, Some(buffer));
            self.gl.bind_buffer(glow::SHADER_STORAGE_BUFFER, None);
        }
    }

    fn apply_render_state(&mut self, state: &RenderState) {
        unsafe {
            if state.depth_test {
                self.gl.enable(glow::DEPTH_TEST);
            }
            if state.cull_back_faces {
                self.gl.front_face(glow::CCW);
                self.gl.enable(glow::CULL_FACE);
                self.gl.cull_face(glow::BACK);
            }
            if state.alpha_blend {
                self.gl.enable(glow::BLEND);
                self.gl.blend_func(glow::SRC_ALPHA, glow::ONE_MINUS_SRC_ALPHA);
            }
            if state.program_point_size {
                self.gl.enable(glow::PROGRAM_POINT_SIZE);
            }
            (self.point_size)(state.point_size);
        }
    }

    fn use_program(&mut self, program: Self::Program) {
        unsafe { self.gl.use_program(Some(program)) }
    }

    fn uniform_matrix4(&mut self, location: Option<&Self::Uniform>, matrix: &Mat4) {
        unsafe { self.gl.uniform_matrix_4_f32_slice(location, false, matrix) }
    }

    fn draw_mesh_tasks(&mut self, first: u32, count: u32) {
        unsafe { (self.draw_mesh_tasks_nv)(first, count) }
    }

    fn last_error(&mut self) -> u32 {
        unsafe { self.gl.get_error() }
    }

    fn delete_shader(&mut self, shader: Self::Shader) {
        unsafe { self.gl.delete_shader(shader) }
    }

    fn delete_program(&mut self, program: Self::Program) {
        unsafe { self.gl.delete_program(program) }
    }

    fn delete_buffer(&mut self, buffer: Self::Buffer) {
        unsafe { self.gl.delete_buffer(buffer) }
    }
}
