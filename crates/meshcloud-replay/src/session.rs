use anyhow::{Context, Result};

use meshcloud_engine::backend::opengl::{shaders, GlCall, GlTrace, MeshShaderBackend, TraceCommands};
use meshcloud_engine::backend::{stub_for, GraphicsBackend};
use meshcloud_engine::config::PluginConfig;
use meshcloud_engine::core::PluginContext;
use meshcloud_engine::device::{DeviceEvent, GraphicsApi};
use meshcloud_engine::render::PluginEvent;
use meshcloud_engine::staging::{Mat4, PointXYZW, VertexStream, IDENTITY};
use meshcloud_ply::PointCloud;

/// What one replay does between device Initialize and Shutdown.
#[derive(Debug, Clone)]
pub struct Session {
    pub api: GraphicsApi,
    pub point_size: f32,
    /// `None` dispatches enough workgroups for the whole cloud.
    pub workgroups: Option<u32>,
    pub frames: u32,
    pub model: Mat4,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            api: GraphicsApi::OpenGLCore,
            point_size: 1.0,
            workgroups: None,
            frames: 1,
            model: IDENTITY,
        }
    }
}

/// Commands and host diagnostics recorded during a replay.
#[derive(Debug, Default)]
pub struct Recording {
    pub calls: Vec<GlCall>,
    pub debug: Vec<String>,
}

impl Session {
    /// Runs the host sequence a Unity scene would: device Initialize, stage
    /// data, Initialize event, `frames` Render events, device Shutdown.
    pub fn run(&self, cloud: &PointCloud, config: PluginConfig) -> Result<Recording> {
        let trace = GlTrace::new();
        let factory_trace = trace.clone();
        let factory = move |api: GraphicsApi| -> Option<Box<dyn GraphicsBackend>> {
            if api.is_opengl() {
                let trace = factory_trace.clone();
                let backend =
                    MeshShaderBackend::new(api, move || Ok(TraceCommands::new(trace.clone())));
                Some(Box::new(backend))
            } else {
                stub_for(api)
            }
        };

        let debug = std::sync::Arc::new(std::sync::Mutex::new(Vec::new()));
        let sink = debug.clone();

        let mut ctx = PluginContext::new(factory, config);
        ctx.register_debug_callback(move |message| {
            if let Ok(mut lines) = sink.lock() {
                lines.push(message.to_owned());
            }
        });

        ctx.on_device_event(DeviceEvent::Initialize, &self.api)
            .context("device initialize")?;

        let count = u32::try_from(cloud.len()).context("point cloud too large")?;
        let workgroups = self
            .workgroups
            .unwrap_or_else(|| shaders::workgroups_to_cover(count));
        log::info!("{count} points, {workgroups} workgroups on {:?}", self.api);

        ctx.set_point_data(stream(&cloud.positions), stream(&cloud.colors));
        ctx.set_draw_data(
            self.point_size,
            i32::try_from(workgroups).context("workgroup count too large")?,
        );
        ctx.set_graphics_matrices(&IDENTITY, &IDENTITY, &self.model);

        ctx.on_render_event(PluginEvent::Initialize)
            .context("storage buffer initialization")?;
        for frame in 0..self.frames {
            ctx.on_render_event(PluginEvent::Render)
                .with_context(|| format!("frame {frame}"))?;
        }

        ctx.on_device_event(DeviceEvent::Shutdown, &self.api)
            .context("device shutdown")?;
        ctx.unload().context("unload")?;

        let debug = debug.lock().map(|lines| lines.clone()).unwrap_or_default();
        Ok(Recording {
            calls: trace.calls(),
            debug,
        })
    }
}

fn stream(records: &[[f32; 4]]) -> VertexStream {
    VertexStream::owned(records.iter().copied().map(PointXYZW::from).collect::<Vec<_>>())
}

/// One line per command; matrices are shortened to their translation column.
pub fn describe(call: &GlCall) -> String {
    match call {
        GlCall::UniformMatrix4 { location, matrix } => {
            let location = location.map_or_else(|| "-".to_owned(), |l| l.to_string());
            format!(
                "UniformMatrix4 {{ location: {location}, translation: [{}, {}, {}] }}",
                matrix[12], matrix[13], matrix[14]
            )
        }
        other => format!("{other:?}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cloud(n: usize) -> PointCloud {
        PointCloud {
            positions: (0..n).map(|i| [i as f32, 0.0, 0.0, 1.0]).collect(),
            colors: vec![[1.0, 0.0, 0.0, 1.0]; n],
        }
    }

    fn draws(calls: &[GlCall]) -> Vec<u32> {
        calls
            .iter()
            .filter_map(|c| match c {
                GlCall::DrawMeshTasks { count, .. } => Some(*count),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn opengl_core_replays_full_lifecycle() {
        let session = Session { frames: 2, ..Session::default() };
        let recording = session.run(&cloud(300), PluginConfig::default()).unwrap();

        assert_eq!(draws(&recording.calls), [2, 2]);
        assert!(recording.calls.contains(&GlCall::CreateStorageBuffer { buffer: 7, bytes: 300 * 16 }));
        assert!(matches!(recording.calls.last(), Some(GlCall::DeleteProgram(_)) | Some(GlCall::DeleteShader(_))));
        // Initialize event plus two frames.
        assert_eq!(recording.debug, ["GL_ERROR: 0", "GL_ERROR: 0", "GL_ERROR: 0"]);
    }

    #[test]
    fn other_apis_issue_no_gl() {
        let session = Session { api: GraphicsApi::Vulkan, ..Session::default() };
        let recording = session.run(&cloud(4), PluginConfig::default()).unwrap();
        assert!(recording.calls.is_empty());
    }

    #[test]
    fn describes_matrices_briefly() {
        let mut matrix = IDENTITY;
        matrix[12] = 3.0;
        let line = describe(&GlCall::UniformMatrix4 { location: Some(4), matrix });
        assert_eq!(line, "UniformMatrix4 { location: 4, translation: [3, 0, 0] }");
    }
}
