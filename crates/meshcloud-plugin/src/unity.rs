//! Unity's native plugin interface registry, as far as this plugin uses it.
//!
//! Layouts mirror `IUnityInterface.h` and `IUnityGraphics.h`; every function
//! pointer uses `UNITY_INTERFACE_API`, which is `extern "system"`.

use std::ptr::NonNull;

use meshcloud_engine::device::{GraphicsApi, HostGraphics};

/// 128-bit interface id, split as Unity passes it.
#[repr(C)]
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct UnityInterfaceGuid {
    pub high: u64,
    pub low: u64,
}

/// Opaque base of every Unity interface.
#[repr(C)]
pub struct IUnityInterface {
    _private: [u8; 0],
}

#[repr(C)]
pub struct IUnityInterfaces {
    pub get_interface:
        Option<unsafe extern "system" fn(guid: UnityInterfaceGuid) -> *mut IUnityInterface>,
    pub register_interface:
        Option<unsafe extern "system" fn(guid: UnityInterfaceGuid, ptr: *mut IUnityInterface)>,
    pub get_interface_split:
        Option<unsafe extern "system" fn(high: u64, low: u64) -> *mut IUnityInterface>,
    pub register_interface_split:
        Option<unsafe extern "system" fn(high: u64, low: u64, ptr: *mut IUnityInterface)>,
}

pub type DeviceEventCallback = unsafe extern "system" fn(event_type: i32);
pub type RenderingEvent = unsafe extern "system" fn(event_id: i32);

#[repr(C)]
pub struct IUnityGraphics {
    pub get_renderer: Option<unsafe extern "system" fn() -> i32>,
    pub register_device_event_callback:
        Option<unsafe extern "system" fn(callback: Option<DeviceEventCallback>)>,
    pub unregister_device_event_callback:
        Option<unsafe extern "system" fn(callback: Option<DeviceEventCallback>)>,
    pub reserve_event_id_range: Option<unsafe extern "system" fn(count: i32) -> i32>,
}

impl IUnityGraphics {
    pub const GUID: UnityInterfaceGuid = UnityInterfaceGuid {
        high: 0x7CBA0A9CA4DDB544,
        low: 0x8C5AD4926EB17B11,
    };
}

/// Handle to the host's `IUnityGraphics`.
#[derive(Debug, Copy, Clone)]
pub struct UnityGraphics {
    raw: NonNull<IUnityGraphics>,
}

impl UnityGraphics {
    /// Looks up `IUnityGraphics` in the registry handed to `UnityPluginLoad`.
    ///
    /// # Safety
    ///
    /// `interfaces` must be null or the registry Unity passed to the plugin,
    /// and the returned handle must not outlive the plugin's load.
    pub unsafe fn from_registry(interfaces: *mut IUnityInterfaces) -> Option<Self> {
        // SAFETY: caller contract; Unity keeps the registry alive while loaded.
        let interfaces = unsafe { interfaces.as_ref()? };
        let guid = IUnityGraphics::GUID;

        let raw = match (interfaces.get_interface_split, interfaces.get_interface) {
            (Some(get), _) => unsafe { get(guid.high, guid.low) },
            (None, Some(get)) => unsafe { get(guid) },
            (None, None) => return None,
        };

        NonNull::new(raw.cast::<IUnityGraphics>()).map(|raw| Self { raw })
    }

    /// Wraps an interface table the test owns.
    #[cfg(test)]
    pub(crate) fn from_static(raw: &'static IUnityGraphics) -> Self {
        Self { raw: NonNull::from(raw) }
    }

    fn vtable(&self) -> &IUnityGraphics {
        // SAFETY: `from_registry` only builds handles from a live interface.
        unsafe { self.raw.as_ref() }
    }

    pub fn register_device_event_callback(&self, callback: DeviceEventCallback) {
        if let Some(register) = self.vtable().register_device_event_callback {
            unsafe { register(Some(callback)) }
        }
    }

    pub fn unregister_device_event_callback(&self, callback: DeviceEventCallback) {
        if let Some(unregister) = self.vtable().unregister_device_event_callback {
            unsafe { unregister(Some(callback)) }
        }
    }
}

impl HostGraphics for UnityGraphics {
    fn renderer(&self) -> GraphicsApi {
        match self.vtable().get_renderer {
            Some(get) => GraphicsApi::from_raw(unsafe { get() }),
            None => GraphicsApi::Null,
        }
    }
}
