//! Replays the plugin's host sequence without Unity or a GPU.
//!
//! Loads a PLY cloud, plays device Initialize, one buffer Initialize event,
//! a number of Render events and device Shutdown, then prints every GL
//! command the renderer issued.

mod session;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use meshcloud_engine::config::PluginConfig;
use meshcloud_engine::device::GraphicsApi;
use meshcloud_engine::logging::init_logging;
use meshcloud_engine::staging::{mat4_from_rows, IDENTITY};

use session::{describe, Session};

#[derive(Parser, Debug)]
#[command(
    name = "meshcloud-replay",
    about = "Drive the point-cloud renderer headlessly and print the GL commands it issues."
)]
struct Args {
    /// Point cloud to stage (binary little-endian .ply)
    cloud: PathBuf,

    /// Point size for every draw
    #[arg(long, default_value_t = 1.0)]
    point_size: f32,

    /// Mesh workgroups per draw (defaults to enough for the whole cloud)
    #[arg(long)]
    workgroups: Option<u32>,

    /// Render events to fire after buffer initialization
    #[arg(long, default_value_t = 1)]
    frames: u32,

    /// Renderer id the simulated host reports (Unity `UnityGfxRenderer`; 17 = OpenGL core)
    #[arg(long, default_value_t = 17, allow_negative_numbers = true)]
    renderer: i32,

    /// Offset the model matrix by this translation
    #[arg(long, value_names = ["X", "Y", "Z"], num_args = 3)]
    translate: Option<Vec<f32>>,

    /// Log filter (env_logger syntax); overrides MESHCLOUD_LOG
    #[arg(long, value_name = "FILTER")]
    log: Option<String>,

    /// Only print the summary
    #[arg(long, action = clap::ArgAction::SetTrue)]
    quiet: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = PluginConfig::from_env();
    if let Some(filter) = args.log.clone() {
        config.logging.env_filter = Some(filter);
    }
    init_logging(config.logging.clone());

    let cloud = meshcloud_ply::load_path(&args.cloud)
        .with_context(|| format!("loading {}", args.cloud.display()))?;
    log::info!("loaded {} points from {}", cloud.len(), args.cloud.display());

    let model = match args.translate.as_deref() {
        Some(&[x, y, z]) => mat4_from_rows([
            [1.0, 0.0, 0.0, x],
            [0.0, 1.0, 0.0, y],
            [0.0, 0.0, 1.0, z],
            [0.0, 0.0, 0.0, 1.0],
        ]),
        _ => IDENTITY,
    };

    let session = Session {
        api: GraphicsApi::from_raw(args.renderer),
        point_size: args.point_size,
        workgroups: args.workgroups,
        frames: args.frames,
        model,
    };
    let recording = session.run(&cloud, config)?;

    if !args.quiet {
        for (index, call) in recording.calls.iter().enumerate() {
            println!("{index:5}  {}", describe(call));
        }
        for line in &recording.debug {
            println!("[debug] {line}");
        }
    }

    println!(
        "{} GL commands, {} debug reports ({:?}, {} points)",
        recording.calls.len(),
        recording.debug.len(),
        session.api,
        cloud.len()
    );
    Ok(())
}
