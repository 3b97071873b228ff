use std::fmt;

use crate::backend::BackendError;

use super::PluginEvent;

/// The backend rejected the operation a render event mapped to.
#[derive(Debug, Clone, PartialEq)]
pub struct DispatchError {
    pub event: PluginEvent,
    pub source: BackendError,
}

impl fmt::Display for DispatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} render event failed: {}", self.event, self.source)
    }
}

impl std::error::Error for DispatchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.source)
    }
}
