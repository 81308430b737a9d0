//! prism - renders the built-in scenes with path tracing and progressive
//! photon mapping, writing the frame after every photon pass.

mod output;
mod scenes;

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use prism_renderer::{RenderConfig, Renderer};

use scenes::ScenePreset;

#[derive(Parser, Debug)]
#[command(name = "prism", version, about = "Offline path tracer with progressive photon mapping")]
struct Cli {
    /// Scene to render
    #[arg(short, long, value_enum, default_value_t = ScenePreset::Lens)]
    scene: ScenePreset,

    /// Output image; `.ppm` is written as ASCII P3, other extensions by format
    #[arg(short, long, default_value = "MainScene.ppm")]
    output: PathBuf,

    /// JSON render configuration replacing the scene's defaults
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[arg(short = 'W', long)]
    width: Option<u32>,

    #[arg(short = 'H', long)]
    height: Option<u32>,

    /// Multisampling iterations per pixel
    #[arg(long)]
    samples: Option<u32>,

    /// Maximum ray depth
    #[arg(long)]
    depth: Option<u32>,

    /// Photons emitted per light per pass
    #[arg(long)]
    photons: Option<u64>,

    /// Photon passes; 0 renders the path-traced image only
    #[arg(long)]
    passes: Option<u32>,

    #[arg(long)]
    seed: Option<u64>,

    /// Shade with geometric normals instead of interpolated vertex normals
    #[arg(long)]
    flat: bool,

    /// Apply gamma 2.0 when quantizing to 8 bits
    #[arg(long)]
    gamma: bool,
}

impl Cli {
    fn apply(&self, config: &mut RenderConfig) {
        if let Some(width) = self.width {
            config.width = width;
        }
        if let Some(height) = self.height {
            config.height = height;
        }
        if let Some(samples) = self.samples {
            config.samples_per_pixel = samples;
        }
        if let Some(depth) = self.depth {
            config.max_depth = depth;
        }
        if let Some(photons) = self.photons {
            config.photons.photons_per_light = photons;
        }
        if let Some(passes) = self.passes {
            config.photons.passes = passes;
        }
        if let Some(seed) = self.seed {
            config.seed = seed;
        }
        if self.flat {
            config.smooth_shading = false;
        }
    }
}

fn load_config(path: &Path) -> Result<RenderConfig> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing config {}", path.display()))
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let setup = cli.scene.build();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => setup.config,
    };
    cli.apply(&mut config);

    log::info!(
        "Rendering {:?} at {}x{}, {} spp, depth {}, {} photon passes of {} photons",
        cli.scene,
        config.width,
        config.height,
        config.samples_per_pixel,
        config.max_depth,
        config.photons.passes,
        config.photons.photons_per_light
    );

    let start = Instant::now();
    let renderer = Renderer::new(&setup.scene, setup.camera, config).context("setting up render")?;

    renderer.render_progressive(|report, frame| {
        if report.passes > 0 {
            log::info!(
                "Pass {}/{}: {} photons stored of {} emitted, {} gathered, mean radius {:.4}",
                report.pass + 1,
                report.passes,
                report.photons_stored,
                report.photons_emitted,
                report.photons_gathered,
                report.mean_radius
            );
        }
        output::write_frame(frame, &cli.output, cli.gamma)
    })?;

    log::info!("Finished in {:.2?}, saved {}", start.elapsed(), cli.output.display());
    Ok(())
}
