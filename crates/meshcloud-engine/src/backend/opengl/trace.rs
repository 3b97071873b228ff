use std::cell::RefCell;
use std::rc::Rc;

use crate::backend::BackendError;
use crate::staging::Mat4;

use super::commands::{GlCommands, RenderState, ShaderStage};

/// One recorded GL command. Handles are the values [`TraceCommands`] handed out.
#[derive(Debug, Clone, PartialEq)]
pub enum GlCall {
    CompileShader { stage: ShaderStage, shader: u32 },
    LinkProgram { program: u32, shaders: Vec<u32> },
    UniformLocation { program: u32, name: String },
    CreateStorageBuffer { buffer: u32, bytes: usize },
    UploadStorageBuffer { buffer: u32, bytes: usize, binding: u32 },
    RenderState(RenderState),
    UseProgram(u32),
    UniformMatrix4 { location: Option<u32>, matrix: Mat4 },
    DrawMeshTasks { first: u32, count: u32 },
    GetError,
    DeleteShader(u32),
    DeleteProgram(u32),
    DeleteBuffer(u32),
}

/// Shared log of recorded commands.
///
/// Clones share the same log, so a test can keep one handle while the backend
/// owns the recorder.
#[derive(Debug, Clone, Default)]
pub struct GlTrace {
    calls: Rc<RefCell<Vec<GlCall>>>,
}

impl GlTrace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<GlCall> {
        self.calls.borrow().clone()
    }

    pub fn len(&self) -> usize {
        self.calls.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.calls.borrow().is_empty()
    }

    pub fn clear(&self) {
        self.calls.borrow_mut().clear();
    }

    fn push(&self, call: GlCall) {
        self.calls.borrow_mut().push(call);
    }
}

/// [`GlCommands`] that records instead of rendering.
///
/// Hands out sequential non-zero handles, one counter for all object kinds.
#[derive(Debug)]
pub struct TraceCommands {
    trace: GlTrace,
    next_handle: u32,
    link_failure: Option<String>,
    pending_errors: Vec<u32>,
}

impl TraceCommands {
    pub fn new(trace: GlTrace) -> Self {
        Self {
            trace,
            next_handle: 1,
            link_failure: None,
            pending_errors: Vec::new(),
        }
    }

    /// Makes every link attempt fail with `log`.
    pub fn with_link_failure(mut self, log: impl Into<String>) -> Self {
        self.link_failure = Some(log.into());
        self
    }

    /// Queues a GL error code for the next `last_error` call.
    pub fn with_pending_error(mut self, code: u32) -> Self {
        self.pending_errors.push(code);
        self
    }

    fn handle(&mut self) -> u32 {
        let handle = self.next_handle;
        self.next_handle += 1;
        handle
    }
}

impl GlCommands for TraceCommands {
    type Shader = u32;
    type Program = u32;
    type Buffer = u32;
    type Uniform = u32;

    fn compile_shader(&mut self, stage: ShaderStage, _source: &str) -> Result<u32, BackendError> {
        let shader = self.handle();
        self.trace.push(GlCall::CompileShader { stage, shader });
        Ok(shader)
    }

    fn link_program(&mut self, shaders: &[u32]) -> Result<u32, BackendError> {
        let program = self.handle();
        self.trace.push(GlCall::LinkProgram { program, shaders: shaders.to_vec() });
        match &self.link_failure {
            Some(log) => Err(BackendError::Link(log.clone())),
            None => Ok(program),
        }
    }

    fn uniform_location(&mut self, program: u32, name: &str) -> Option<u32> {
        self.trace.push(GlCall::UniformLocation { program, name: name.to_owned() });
        Some(self.handle())
    }

    fn create_storage_buffer(&mut self, bytes: usize) -> Result<u32, BackendError> {
        let buffer = self.handle();
        self.trace.push(GlCall::CreateStorageBuffer { buffer, bytes });
        Ok(buffer)
    }

    fn upload_storage_buffer(&mut self, buffer: u32, data: &[u8], binding: u32) {
        self.trace.push(GlCall::UploadStorageBuffer { buffer, bytes: data.len(), binding });
    }

    fn apply_render_state(&mut self, state: &RenderState) {
        self.trace.push(GlCall::RenderState(*state));
    }

    fn use_program(&mut self, program: u32) {
        self.trace.push(GlCall::UseProgram(program));
    }

    fn uniform_matrix4(&mut self, location: Option<&u32>, matrix: &Mat4) {
        self.trace.push(GlCall::UniformMatrix4 { location: location.copied(), matrix: *matrix });
    }

    fn draw_mesh_tasks(&mut self, first: u32, count: u32) {
        self.trace.push(GlCall::DrawMeshTasks { first, count });
    }

    fn last_error(&mut self) -> u32 {
        self.trace.push(GlCall::GetError);
        if self.pending_errors.is_empty() {
            glow::NO_ERROR
        } else {
            self.pending_errors.remove(0)
        }
    }

    fn delete_shader(&mut self, shader: u32) {
        self.trace.push(GlCall::DeleteShader(shader));
    }

    fn delete_program(&mut self, program: u32) {
        self.trace.push(GlCall::DeleteProgram(program));
    }

    fn delete_buffer(&mut self, buffer: u32) {
        self.trace.push(GlCall::DeleteBuffer(buffer));
    }
}
