use std::fmt;

use super::opengl::ShaderStage;

/// Failure inside a graphics backend.
#[derive(Debug, Clone, PartialEq)]
pub enum BackendError {
    /// A shader stage failed to compile; carries the driver's info log.
    Compile { stage: ShaderStage, log: String },
    /// The program failed to link; carries the driver's info log.
    Link(String),
    /// A required GL entry point could not be resolved.
    MissingEntryPoint(&'static str),
    /// The driver refused to create an object.
    ResourceCreation(String),
    /// Draw was requested before storage buffers were initialized.
    BuffersNotInitialized,
    /// Buffer or draw work was requested before the device was initialized.
    ProgramNotInitialized,
}

impl fmt::Display for BackendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Compile { stage, log } => write!(f, "{stage:?} shader failed to compile: {log}"),
            Self::Link(log) => write!(f, "shader program failed to link: {log}"),
            Self::MissingEntryPoint(name) => write!(f, "GL entry point `{name}` is unavailable"),
            Self::ResourceCreation(msg) => write!(f, "failed to create GPU resource: {msg}"),
            Self::BuffersNotInitialized => {
                f.write_str("draw requested before storage buffers were initialized")
            }
            Self::ProgramNotInitialized => {
                f.write_str("GPU work requested before the device was initialized")
            }
        }
    }
}

impl std::error::Error for BackendError {}
