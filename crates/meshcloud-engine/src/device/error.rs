use std::fmt;

use crate::backend::BackendError;

use super::GraphicsApi;

/// Failure while routing a device event.
#[derive(Debug, Clone, PartialEq)]
pub enum RouterError {
    /// Initialize arrived while a backend is still alive (no Shutdown in between).
    AlreadyInitialized { api: GraphicsApi },
    /// The active backend failed to handle the event.
    Backend(BackendError),
}

impl fmt::Display for RouterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AlreadyInitialized { api } => write!(
                f,
                "device initialize received while a {api:?} backend is still active"
            ),
            Self::Backend(err) => write!(f, "backend failed to handle device event: {err}"),
        }
    }
}

impl std::error::Error for RouterError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::AlreadyInitialized { .. } => None,
            Self::Backend(err) => Some(err),
        }
    }
}

impl From<BackendError> for RouterError {
    fn from(err: BackendError) -> Self {
        Self::Backend(err)
    }
}
