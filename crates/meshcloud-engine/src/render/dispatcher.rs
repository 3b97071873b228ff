use crate::backend::BackendFactory;
use crate::config::DebugReport;
use crate::core::DebugChannel;
use crate::device::{DeviceRouter, GraphicsApi};
use crate::staging::FrameStaging;

use super::{DispatchError, PluginEvent};

/// API whose backend performs real work on render events.
const DRAW_API: GraphicsApi = GraphicsApi::OpenGLCore;

/// Maps render events onto the active backend.
///
/// Only an OpenGL core device receives buffer or draw work; every other API
/// is a silent no-op even when a backend exists for it. After any dispatch
/// that reaches a backend, the backend's latest error code is reported as
/// `GL_ERROR: <code>` according to the [`DebugReport`] policy.
#[derive(Debug, Default, Clone, Copy)]
pub struct RenderDispatcher {
    report: DebugReport,
}

impl RenderDispatcher {
    pub fn new(report: DebugReport) -> Self {
        Self { report }
    }

    pub fn dispatch<F: BackendFactory>(
        &self,
        event: PluginEvent,
        router: &mut DeviceRouter<F>,
        staging: &FrameStaging,
        debug: &DebugChannel,
    ) -> Result<(), DispatchError> {
        let api = router.api();
        let Some(backend) = router.backend_mut() else {
            return Ok(());
        };

        let result = if api == DRAW_API {
            match event {
                PluginEvent::Initialize => backend.initialize_storage_buffers(
                    staging.positions().clone(),
                    staging.colors().clone(),
                    staging.vertex_count(),
                ),
                PluginEvent::Render => backend.draw_mesh_shader(
                    staging.projection(),
                    staging.view(),
                    staging.model(),
                    staging.point_size(),
                    staging.workgroups(),
                ),
                PluginEvent::None => Ok(()),
            }
        } else {
            log::trace!("{event:?} ignored on {api:?}");
            Ok(())
        };

        let code = backend.poll_error();
        if self.report.should_report(code) {
            debug.emit(&format!("GL_ERROR: {code}"));
        }

        result.map_err(|source| DispatchError { event, source })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{GraphicsBackend, StubBackend};
    use crate::device::DeviceEvent;
    use std::sync::{Arc, Mutex};

    fn stub_factory(api: GraphicsApi) -> Option<Box<dyn GraphicsBackend>> {
        Some(Box::new(StubBackend::new(api)))
    }

    fn capture() -> (DebugChannel, Arc<Mutex<Vec<String>>>) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let channel = DebugChannel::with_callback(move |msg| sink.lock().unwrap().push(msg.to_owned()));
        (channel, seen)
    }

    // ── reporting ─────────────────────────────────────────────────────────

    #[test]
    fn no_backend_reports_nothing() {
        let mut router = DeviceRouter::new(stub_factory);
        let (debug, seen) = capture();
        RenderDispatcher::default()
            .dispatch(PluginEvent::Render, &mut router, &FrameStaging::new(), &debug)
            .unwrap();
        assert!(seen.lock().unwrap().is_empty());
    }

    #[test]
    fn gated_api_still_reports() {
        let mut router = DeviceRouter::new(stub_factory);
        router.on_device_event(DeviceEvent::Initialize, &GraphicsApi::Vulkan).unwrap();
        let (debug, seen) = capture();

        RenderDispatcher::default()
            .dispatch(PluginEvent::Render, &mut router, &FrameStaging::new(), &debug)
            .unwrap();
        assert_eq!(*seen.lock().unwrap(), ["GL_ERROR: 0"]);
    }

    #[test]
    fn errors_only_suppresses_clean_dispatches() {
        let mut router = DeviceRouter::new(stub_factory);
        router.on_device_event(DeviceEvent::Initialize, &GraphicsApi::Vulkan).unwrap();
        let (debug, seen) = capture();

        RenderDispatcher::new(DebugReport::ErrorsOnly)
            .dispatch(PluginEvent::None, &mut router, &FrameStaging::new(), &debug)
            .unwrap();
        assert!(seen.lock().unwrap().is_empty());
    }
}
