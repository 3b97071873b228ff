use std::fmt;

use crate::backend::BackendError;
use crate::staging::Mat4;

/// `GL_MESH_SHADER_NV`; not exported by `glow`.
pub(crate) const MESH_SHADER_NV: u32 = 0x9559;

/// Programmable stage a shader object belongs to.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum ShaderStage {
    Mesh,
    Fragment,
}

impl ShaderStage {
    pub const fn gl_enum(self) -> u32 {
        match self {
            Self::Mesh => MESH_SHADER_NV,
            Self::Fragment => glow::FRAGMENT_SHADER,
        }
    }
}

/// Fixed-function state set before every point draw.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct RenderState {
    pub depth_test: bool,
    /// Counter-clockwise front faces, back faces culled.
    pub cull_back_faces: bool,
    /// `SRC_ALPHA, ONE_MINUS_SRC_ALPHA` blending.
    pub alpha_blend: bool,
    pub program_point_size: bool,
    pub point_size: f32,
}

impl RenderState {
    pub const fn points(point_size: f32) -> Self {
        Self {
            depth_test: true,
            cull_back_faces: true,
            alpha_blend: true,
            program_point_size: true,
            point_size,
        }
    }
}

/// The GL command surface the mesh backend issues.
///
/// Methods bundle the GL calls that always travel together (create, source
/// and compile a shader; bind, fill and bind-base a storage buffer) so a
/// recording implementation sees one entry per logical step.
pub trait GlCommands {
    type Shader: Copy + fmt::Debug;
    type Program: Copy + fmt::Debug;
    type Buffer: Copy + fmt::Debug;
    type Uniform: Clone + fmt::Debug;

    fn compile_shader(&mut self, stage: ShaderStage, source: &str)
        -> Result<Self::Shader, BackendError>;

    /// Attaches `shaders`, links, and checks the link status.
    fn link_program(&mut self, shaders: &[Self::Shader]) -> Result<Self::Program, BackendError>;

    fn uniform_location(&mut self, program: Self::Program, name: &str) -> Option<Self::Uniform>;

    /// Creates a shader storage buffer with `bytes` of uninitialized storage.
    fn create_storage_buffer(&mut self, bytes: usize) -> Result<Self::Buffer, BackendError>;

    /// Replaces the full contents of `buffer` with `data` and binds it to the
    /// storage binding point `binding`.
    fn upload_storage_buffer(&mut self, buffer: Self::Buffer, data: &[u8], binding: u32);

    fn apply_render_state(&mut self, state: &RenderState);

    fn use_program(&mut self, program: Self::Program);

    /// Uploads a column-major `mat4` uniform. A `None` location is ignored by
    /// GL, as for uniforms the compiler optimized out.
    fn uniform_matrix4(&mut self, location: Option<&Self::Uniform>, matrix: &Mat4);

    /// `glDrawMeshTasksNV(first, count)`.
    fn draw_mesh_tasks(&mut self, first: u32, count: u32);

    /// `glGetError`; returns and clears the oldest pending error.
    fn last_error(&mut self) -> u32;

    fn delete_shader(&mut self, shader: Self::Shader);
    fn delete_program(&mut self, program: Self::Program);
    fn delete_buffer(&mut self, buffer: Self::Buffer);
}
