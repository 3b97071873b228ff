use std::fmt;

type Callback = Box<dyn Fn(&str) + Send>;

/// Human-readable diagnostics for the host.
///
/// Messages are always mirrored to `log` at debug level; the host callback is
/// optional and may be replaced at any time.
#[derive(Default)]
pub struct DebugChannel {
    callback: Option<Callback>,
}

impl DebugChannel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_callback(callback: impl Fn(&str) + Send + 'static) -> Self {
        Self {
            callback: Some(Box::new(callback)),
        }
    }

    pub fn set_callback(&mut self, callback: impl Fn(&str) + Send + 'static) {
        self.callback = Some(Box::new(callback));
    }

    pub fn clear_callback(&mut self) {
        self.callback = None;
    }

    pub fn has_callback(&self) -> bool {
        self.callback.is_some()
    }

    pub fn emit(&self, message: &str) {
        log::debug!("{message}");
        if let Some(callback) = &self.callback {
            callback(message);
        }
    }
}

impl fmt::Debug for DebugChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DebugChannel")
            .field("callback", &self.callback.is_some())
            .finish()
    }
}
