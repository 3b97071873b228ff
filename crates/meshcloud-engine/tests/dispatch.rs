//! Render dispatch through `PluginContext` with a recording backend.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::{Arc, Mutex};

use meshcloud_engine::backend::{BackendError, GraphicsBackend};
use meshcloud_engine::config::{DebugReport, PluginConfig};
use meshcloud_engine::core::PluginContext;
use meshcloud_engine::device::{DeviceEvent, GraphicsApi, HostGraphics};
use meshcloud_engine::render::{DispatchError, PluginEvent};
use meshcloud_engine::staging::{Mat4, PointXYZW, VertexStream, IDENTITY};

#[derive(Debug, Clone, PartialEq)]
enum Call {
    Device(DeviceEvent),
    InitBuffers { vertex_count: usize, positions: usize, colors: usize },
    Draw { matrices: [Mat4; 3], point_size: f32, workgroups: u32 },
}

type CallLog = Rc<RefCell<Vec<Call>>>;

struct RecordingBackend {
    api: GraphicsApi,
    calls: CallLog,
    error_code: u32,
    fail_draw: bool,
}

impl GraphicsBackend for RecordingBackend {
    fn api(&self) -> GraphicsApi {
        self.api
    }

    fn process_device_event(
        &mut self,
        event: DeviceEvent,
        _host: &dyn HostGraphics,
    ) -> Result<(), BackendError> {
        self.calls.borrow_mut().push(Call::Device(event));
        Ok(())
    }

    fn initialize_storage_buffers(
        &mut self,
        positions: VertexStream,
        colors: VertexStream,
        vertex_count: usize,
    ) -> Result<(), BackendError> {
        self.calls.borrow_mut().push(Call::InitBuffers {
            vertex_count,
            positions: positions.len(),
            colors: colors.len(),
        });
        Ok(())
    }

    fn draw_mesh_shader(
        &mut self,
        projection: &Mat4,
        view: &Mat4,
        model: &Mat4,
        point_size: f32,
        workgroups: u32,
    ) -> Result<(), BackendError> {
        self.calls.borrow_mut().push(Call::Draw {
            matrices: [*projection, *view, *model],
            point_size,
            workgroups,
        });
        if self.fail_draw {
            return Err(BackendError::BuffersNotInitialized);
        }
        Ok(())
    }

    fn poll_error(&mut self) -> u32 {
        self.error_code
    }
}

struct Harness {
    calls: CallLog,
    reports: Arc<Mutex<Vec<String>>>,
}

impl Harness {
    fn new() -> Self {
        Self {
            calls: Rc::new(RefCell::new(Vec::new())),
            reports: Arc::new(Mutex::new(Vec::new())),
        }
    }

    fn context(
        &self,
        report: DebugReport,
        error_code: u32,
        fail_draw: bool,
    ) -> PluginContext<impl FnMut(GraphicsApi) -> Option<Box<dyn GraphicsBackend>>> {
        let calls = self.calls.clone();
        let factory = move |api: GraphicsApi| {
            Some(Box::new(RecordingBackend {
                api,
                calls: calls.clone(),
                error_code,
                fail_draw,
            }) as Box<dyn GraphicsBackend>)
        };
        let config = PluginConfig {
            debug_report: report,
            ..PluginConfig::default()
        };
        let mut ctx = PluginContext::new(factory, config);

        let reports = self.reports.clone();
        ctx.register_debug_callback(move |m| reports.lock().unwrap().push(m.to_owned()));
        ctx
    }

    fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    fn reports(&self) -> Vec<String> {
        self.reports.lock().unwrap().clone()
    }
}

fn four_points() -> VertexStream {
    VertexStream::owned(vec![
        PointXYZW::new(0.0, 0.0, 0.0, 1.0),
        PointXYZW::new(1.0, 0.0, 0.0, 1.0),
        PointXYZW::new(0.0, 1.0, 0.0, 1.0),
        PointXYZW::new(0.0, 0.0, 1.0, 1.0),
    ])
}

// ── end to end ────────────────────────────────────────────────────────────

#[test]
fn initialize_then_render_on_opengl_core() {
    let h = Harness::new();
    let mut ctx = h.context(DebugReport::EveryDispatch, 0, false);

    ctx.on_device_event(DeviceEvent::Initialize, &GraphicsApi::OpenGLCore).unwrap();
    ctx.set_point_data(four_points(), four_points());
    ctx.set_draw_data(5.0, 2);
    ctx.set_graphics_matrices(&IDENTITY, &IDENTITY, &IDENTITY);

    ctx.on_render_event(PluginEvent::Initialize).unwrap();
    ctx.on_render_event(PluginEvent::Render).unwrap();

    assert_eq!(
        h.calls(),
        [
            Call::Device(DeviceEvent::Initialize),
            Call::InitBuffers { vertex_count: 4, positions: 4, colors: 4 },
            Call::Draw { matrices: [IDENTITY; 3], point_size: 5.0, workgroups: 2 },
        ]
    );
    assert_eq!(h.reports(), ["GL_ERROR: 0", "GL_ERROR: 0"]);
}

#[test]
fn zero_vertices_still_dispatches() {
    let h = Harness::new();
    let mut ctx = h.context(DebugReport::EveryDispatch, 0, false);

    ctx.on_device_event(DeviceEvent::Initialize, &GraphicsApi::OpenGLCore).unwrap();
    ctx.set_draw_data(1.0, 3);
    ctx.on_render_event(PluginEvent::Initialize).unwrap();
    ctx.on_render_event(PluginEvent::Render).unwrap();

    assert_eq!(
        h.calls()[1..],
        [
            Call::InitBuffers { vertex_count: 0, positions: 0, colors: 0 },
            Call::Draw { matrices: [IDENTITY; 3], point_size: 1.0, workgroups: 3 },
        ]
    );
}

// ── gating ────────────────────────────────────────────────────────────────

#[test]
fn other_apis_receive_no_gpu_work() {
    for api in [
        GraphicsApi::OpenGLES30,
        GraphicsApi::Direct3D11,
        GraphicsApi::Direct3D12,
        GraphicsApi::Metal,
        GraphicsApi::Vulkan,
    ] {
        let h = Harness::new();
        let mut ctx = h.context(DebugReport::EveryDispatch, 0, false);
        ctx.on_device_event(DeviceEvent::Initialize, &api).unwrap();
        ctx.set_point_data(four_points(), four_points());

        ctx.on_render_event(PluginEvent::Initialize).unwrap();
        ctx.on_render_event(PluginEvent::Render).unwrap();

        assert_eq!(h.calls(), [Call::Device(DeviceEvent::Initialize)], "{api:?}");
        assert_eq!(h.reports().len(), 2, "{api:?} still reports after each dispatch");
    }
}

#[test]
fn none_and_unknown_events_do_nothing_but_report() {
    let h = Harness::new();
    let mut ctx = h.context(DebugReport::EveryDispatch, 0, false);
    ctx.on_device_event(DeviceEvent::Initialize, &GraphicsApi::OpenGLCore).unwrap();

    ctx.on_render_event(PluginEvent::None).unwrap();
    ctx.on_render_event(PluginEvent::from_raw(99)).unwrap();

    assert_eq!(h.calls().len(), 1);
    assert_eq!(h.reports().len(), 2);
}

#[test]
fn without_device_nothing_happens() {
    let h = Harness::new();
    let mut ctx = h.context(DebugReport::EveryDispatch, 0, false);
    ctx.on_render_event(PluginEvent::Render).unwrap();
    assert!(h.calls().is_empty());
    assert!(h.reports().is_empty());
}

// ── error reporting ───────────────────────────────────────────────────────

#[test]
fn gpu_error_code_is_reported() {
    let h = Harness::new();
    let mut ctx = h.context(DebugReport::ErrorsOnly, 0x0502, false);
    ctx.on_device_event(DeviceEvent::Initialize, &GraphicsApi::OpenGLCore).unwrap();

    ctx.on_render_event(PluginEvent::Render).unwrap();
    assert_eq!(h.reports(), ["GL_ERROR: 1282"]);
}

#[test]
fn backend_failure_is_reported_then_returned() {
    let h = Harness::new();
    let mut ctx = h.context(DebugReport::EveryDispatch, 0, true);
    ctx.on_device_event(DeviceEvent::Initialize, &GraphicsApi::OpenGLCore).unwrap();

    let err = ctx.on_render_event(PluginEvent::Render).unwrap_err();
    assert_eq!(
        err,
        DispatchError {
            event: PluginEvent::Render,
            source: BackendError::BuffersNotInitialized,
        }
    );
    assert_eq!(h.reports(), ["GL_ERROR: 0"]);
}
