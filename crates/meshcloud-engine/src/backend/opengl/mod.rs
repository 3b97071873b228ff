//! OpenGL mesh-shader backend.
//!
//! [`MeshShaderBackend`] draws staged points with a `GL_NV_mesh_shader`
//! program. It talks to GL only through [`GlCommands`], which has two
//! implementations:
//! - [`GlowCommands`]: real GL through `glow`, plus the extension entry
//!   points `glow` does not wrap
//! - [`TraceCommands`]: records every command; used by tests and the replay
//!   harness

mod commands;
mod mesh;
mod native;
pub mod shaders;
mod trace;

pub use commands::{GlCommands, RenderState, ShaderStage};
pub use mesh::{MeshShaderBackend, COLOR_BINDING, POSITION_BINDING};
pub use native::{GlowCommands, ProcLoader};
pub use trace::{GlCall, GlTrace, TraceCommands};
