//! Unity native rendering plugin.
//!
//! Exposes the C ABI the Unity scripts bind to and forwards every call to a
//! process-wide [`meshcloud_engine::core::PluginContext`]:
//!
//! | Export | Purpose |
//! |--------|---------|
//! | `UnityPluginLoad` / `UnityPluginUnload` | Device event subscription |
//! | `RegisterDebugCallback` | Host sink for `GL_ERROR: <code>` reports |
//! | `SetShaderPointData` | Position and color arrays (not copied) |
//! | `SetShaderDrawData` | Point size and mesh workgroup count |
//! | `SetGraphicsMatrices` | Projection, view and model (copied) |
//! | `GetRenderEventFunc` | Callback for `GL.IssuePluginEvent` |
//!
//! Contract violations (a second device Initialize, drawing before the
//! storage buffers exist, a shader program that fails to link) are logged
//! and then panic, which aborts the host process at the FFI boundary.

mod instance;
mod loader;
pub mod unity;

use anyhow::Context;

use meshcloud_engine::backend::BackendError;
use meshcloud_engine::config::PluginConfig;
use meshcloud_engine::device::{DeviceEvent, RouterError};
use meshcloud_engine::logging::init_logging;
use meshcloud_engine::render::PluginEvent;
use meshcloud_engine::staging::{Mat4, PointXYZW, VertexStream};

pub use instance::DebugCallback;
use unity::{IUnityInterfaces, RenderingEvent, UnityGraphics};

/// Replaces the debug sink. A null callback keeps the current one.
///
/// The callback runs after the entry point that produced the message has
/// released the plugin, so it may call back into any export.
#[unsafe(no_mangle)]
pub extern "system" fn RegisterDebugCallback(callback: Option<DebugCallback>) {
    let Some(callback) = callback else {
        return;
    };
    instance::with(|plugin| plugin.set_debug_sink(callback));
}

/// Stages `count` position and color records.
///
/// # Safety
///
/// Both arrays must hold `count` records and stay valid and unchanged until
/// the render event that consumes them (the next Initialize or Render) has
/// run. Null arrays or a non-positive count stage an empty cloud.
#[unsafe(no_mangle)]
pub unsafe extern "system" fn SetShaderPointData(
    count: i32,
    positions: *const PointXYZW,
    colors: *const PointXYZW,
) {
    let count = usize::try_from(count).unwrap_or(0);
    // SAFETY: forwarded caller contract.
    let (positions, colors) = unsafe {
        (
            VertexStream::from_host(positions, count),
            VertexStream::from_host(colors, count),
        )
    };
    instance::with(|plugin| plugin.context.set_point_data(positions, colors));
}

#[unsafe(no_mangle)]
pub extern "system" fn SetShaderDrawData(point_size: f32, workgroups: i32) {
    instance::with(|plugin| plugin.context.set_draw_data(point_size, workgroups));
}

/// Copies three column-major 4×4 matrices.
///
/// # Safety
///
/// Each pointer must be null or point to 16 readable floats. A null pointer
/// leaves all three matrices unchanged.
#[unsafe(no_mangle)]
pub unsafe extern "system" fn SetGraphicsMatrices(
    projection: *const f32,
    view: *const f32,
    model: *const f32,
) {
    if projection.is_null() || view.is_null() || model.is_null() {
        log::warn!("SetGraphicsMatrices called with a null matrix; ignored");
        return;
    }
    // SAFETY: caller contract; each points to 16 floats.
    let (projection, view, model) = unsafe {
        (
            projection.cast::<Mat4>().read_unaligned(),
            view.cast::<Mat4>().read_unaligned(),
            model.cast::<Mat4>().read_unaligned(),
        )
    };
    instance::with(|plugin| plugin.context.set_graphics_matrices(&projection, &view, &model));
}

/// # Safety
///
/// `interfaces` must be the registry Unity passes to native plugins.
#[unsafe(no_mangle)]
pub unsafe extern "system" fn UnityPluginLoad(interfaces: *mut IUnityInterfaces) {
    init_logging(PluginConfig::from_env().logging);

    // SAFETY: forwarded caller contract.
    let Some(graphics) = (unsafe { UnityGraphics::from_registry(interfaces) }) else {
        log::error!("IUnityGraphics is unavailable; the plugin stays inactive");
        return;
    };

    instance::with(|plugin| plugin.graphics = Some(graphics));
    graphics.register_device_event_callback(on_graphics_device_event);
    log::info!("plugin loaded");

    // The device may already exist; Unity does not replay its Initialize.
    handle_device_event(DeviceEvent::Initialize);
}

#[unsafe(no_mangle)]
pub extern "system" fn UnityPluginUnload() {
    let Some(mut plugin) = instance::take() else {
        return;
    };
    if let Some(graphics) = plugin.graphics {
        graphics.unregister_device_event_callback(on_graphics_device_event);
    }
    if let Err(err) = plugin.context.unload() {
        log::error!("unload: {err}");
    }
    log::info!("plugin unloaded");
}

#[unsafe(no_mangle)]
pub extern "system" fn GetRenderEventFunc() -> RenderingEvent {
    on_render_event
}

extern "system" fn on_graphics_device_event(event_type: i32) {
    handle_device_event(DeviceEvent::from_raw(event_type));
}

extern "system" fn on_render_event(event_id: i32) {
    handle_render_event(event_id);
}

/// Device failures the plugin survives: the device is left without a
/// backend and every later event is a no-op.
fn is_degradable(err: &RouterError) -> bool {
    matches!(
        err,
        RouterError::Backend(BackendError::MissingEntryPoint(_) | BackendError::Compile { .. })
    )
}

fn handle_device_event(event: DeviceEvent) {
    let result = instance::with(|plugin| {
        let Some(graphics) = plugin.graphics else {
            log::warn!("device event {event:?} before UnityPluginLoad; ignored");
            return Ok(());
        };
        plugin.context.on_device_event(event, &graphics)
    });

    match result {
        Ok(()) => {}
        Err(err) if is_degradable(&err) => {
            log::error!("mesh shaders unavailable on this device, nothing will be drawn: {err}");
        }
        Err(err) => fail_fast(anyhow::Error::from(err).context(format!("device event {event:?}"))),
    }
}

fn handle_render_event(event_id: i32) {
    let event = PluginEvent::from_raw(event_id);
    let result = instance::with(|plugin| plugin.context.on_render_event(event));
    if let Err(err) = result.with_context(|| format!("render event {event_id}")) {
        fail_fast(err);
    }
}

fn fail_fast(err: anyhow::Error) -> ! {
    log::error!("{err:#}");
    panic!("{err:#}");
}
