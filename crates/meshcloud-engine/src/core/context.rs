use crate::backend::BackendFactory;
use crate::config::PluginConfig;
use crate::device::{DeviceEvent, DeviceRouter, HostGraphics, RouterError};
use crate::render::{DispatchError, PluginEvent, RenderDispatcher};
use crate::staging::{FrameStaging, Mat4, VertexStream};

use super::DebugChannel;

/// Everything one loaded plugin instance owns.
///
/// All methods expect to be called serially from the host's render thread,
/// or from its main thread while no render event is in flight.
pub struct PluginContext<F> {
    staging: FrameStaging,
    router: DeviceRouter<F>,
    dispatcher: RenderDispatcher,
    debug: DebugChannel,
}

impl<F: BackendFactory> PluginContext<F> {
    pub fn new(factory: F, config: PluginConfig) -> Self {
        Self {
            staging: FrameStaging::new(),
            router: DeviceRouter::new(factory),
            dispatcher: RenderDispatcher::new(config.debug_report),
            debug: DebugChannel::new(),
        }
    }

    pub fn register_debug_callback(&mut self, callback: impl Fn(&str) + Send + 'static) {
        self.debug.set_callback(callback);
    }

    /// Stages the vertex streams read by the next Initialize and Render events.
    pub fn set_point_data(&mut self, positions: VertexStream, colors: VertexStream) {
        log::debug!("staged {} points", positions.len());
        self.staging.set_points(positions, colors);
    }

    /// Negative workgroup counts are clamped to zero.
    pub fn set_draw_data(&mut self, point_size: f32, workgroups: i32) {
        let workgroups = u32::try_from(workgroups).unwrap_or_else(|_| {
            log::warn!("negative workgroup count {workgroups} clamped to 0");
            0
        });
        self.staging.set_draw_params(point_size, workgroups);
    }

    pub fn set_graphics_matrices(&mut self, projection: &Mat4, view: &Mat4, model: &Mat4) {
        self.staging.set_matrices(projection, view, model);
    }

    pub fn on_device_event(
        &mut self,
        event: DeviceEvent,
        host: &dyn HostGraphics,
    ) -> Result<(), RouterError> {
        self.router.on_device_event(event, host)
    }

    pub fn on_render_event(&mut self, event: PluginEvent) -> Result<(), DispatchError> {
        self.dispatcher
            .dispatch(event, &mut self.router, &self.staging, &self.debug)
    }

    /// Drops staged host views and shuts down a device the host left active.
    pub fn unload(&mut self) -> Result<(), RouterError> {
        self.staging.clear();
        self.debug.clear_callback();

        if !self.router.is_active() {
            return Ok(());
        }
        let api = self.router.api();
        log::info!("unloading with an active {api:?} device; shutting it down");
        self.router.on_device_event(DeviceEvent::Shutdown, &api)
    }

    pub fn staging(&self) -> &FrameStaging {
        &self.staging
    }

    pub fn router(&self) -> &DeviceRouter<F> {
        &self.router
    }

    pub fn debug(&self) -> &DebugChannel {
        &self.debug
    }
}
