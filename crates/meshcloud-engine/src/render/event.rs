/// Render-thread event ids understood by the plugin.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum PluginEvent {
    None,
    /// Allocate storage buffers for the staged streams.
    Initialize,
    /// Draw the staged streams.
    Render,
}

impl PluginEvent {
    /// Unknown ids decode to [`PluginEvent::None`].
    pub const fn from_raw(raw: i32) -> Self {
        match raw {
            1 => Self::Initialize,
            2 => Self::Render,
            _ => Self::None,
        }
    }

    pub const fn to_raw(self) -> i32 {
        match self {
            Self::None => 0,
            Self::Initialize => 1,
            Self::Render => 2,
        }
    }
}
