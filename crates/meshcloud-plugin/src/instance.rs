use std::ffi::{CString, c_char};
use std::sync::{Arc, Mutex, PoisonError};

use meshcloud_engine::backend::NativeFactory;
use meshcloud_engine::config::PluginConfig;
use meshcloud_engine::core::PluginContext;

use crate::loader;
use crate::unity::UnityGraphics;

/// Host logging sink; receives a NUL-terminated message.
pub type DebugCallback = unsafe extern "system" fn(message: *const c_char);

/// The one plugin instance per loaded library.
pub(crate) struct Plugin {
    pub context: PluginContext<NativeFactory>,
    /// Set by `UnityPluginLoad`; device events before that are ignored.
    pub graphics: Option<UnityGraphics>,
    debug_sink: Option<DebugCallback>,
    /// Messages emitted under the plugin lock, delivered once it is released.
    pending: Arc<Mutex<Vec<String>>>,
}

impl Plugin {
    fn new() -> Self {
        let factory = match loader::platform_loader() {
            Ok(loader) => NativeFactory::new(loader),
            Err(err) => {
                log::warn!("{err:#}; OpenGL devices will run without a backend");
                NativeFactory::without_gl()
            }
        };
        Self {
            context: PluginContext::new(factory, PluginConfig::from_env()),
            graphics: None,
            debug_sink: None,
            pending: Arc::default(),
        }
    }

    /// Routes debug messages to `sink`, replacing the previous one.
    pub fn set_debug_sink(&mut self, sink: DebugCallback) {
        self.debug_sink = Some(sink);
        let pending = Arc::clone(&self.pending);
        self.context.register_debug_callback(move |message| {
            pending
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push(message.to_owned());
        });
    }

    fn drain_debug(&mut self) -> Option<(DebugCallback, Vec<String>)> {
        let messages = std::mem::take(&mut *self.pending.lock().unwrap_or_else(PoisonError::into_inner));
        self.debug_sink.map(|sink| (sink, messages))
    }
}

/// Moves host-thread state into a `static`.
///
/// The plugin holds GL handles and `Rc`s that must stay on the thread that
/// created them. The host calls every entry point from its render or main
/// thread, one at a time, and the mutex keeps even a misbehaving host from
/// touching the state concurrently.
struct HostBound<T>(T);

// SAFETY: see the type docs; access is serialized by `PLUGIN`'s mutex and by
// the host's calling contract.
unsafe impl<T> Send for HostBound<T> {}

static PLUGIN: Mutex<Option<HostBound<Plugin>>> = Mutex::new(None);

/// Runs `f` on the plugin, creating it on first use.
///
/// `f` must not call back into another entry point; the lock is not
/// reentrant. Debug messages `f` produces reach the host after the lock is
/// released, so the host callback may call any entry point.
pub(crate) fn with<R>(f: impl FnOnce(&mut Plugin) -> R) -> R {
    let (result, delivery) = {
        let mut slot = PLUGIN.lock().unwrap_or_else(PoisonError::into_inner);
        let plugin = &mut slot.get_or_insert_with(|| HostBound(Plugin::new())).0;
        let result = f(plugin);
        (result, plugin.drain_debug())
    };

    if let Some((sink, messages)) = delivery {
        for message in messages {
            if let Ok(message) = CString::new(message) {
                // SAFETY: the host registered a callback taking a C string.
                unsafe { sink(message.as_ptr()) }
            }
        }
    }
    result
}

/// Removes the plugin, if one was created.
pub(crate) fn take() -> Option<Plugin> {
    PLUGIN
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .take()
        .map(|plugin| plugin.0)
}
