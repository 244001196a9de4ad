//! field-sketch: render the coil field quiver or the wormhole surfaces

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use field_sketch::export::{write_stl, FieldFrame};
use field_sketch::render::{render_quiver, render_surface};
use field_sketch::{CoilScene, SketchConfig, WormholeScene};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "field-sketch")]
#[command(about = "Toroidal-coil field quivers and wormhole surface plots")]
#[command(version)]
struct Args {
    /// JSON scene configuration; omitted fields keep their defaults
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Quiver plot of two counter-rotating toroidal coils
    Coil {
        /// Output image (.png or .svg)
        #[arg(short, long, default_value = "coil_field.png")]
        output: PathBuf,

        /// Samples per grid axis
        #[arg(long)]
        points: Option<usize>,

        /// Draw every n-th node along each axis
        #[arg(long)]
        subsample: Option<usize>,

        /// Also write the superposed field as a binary FIELD frame
        #[arg(long)]
        field_dump: Option<PathBuf>,
    },

    /// Catenoid ("wormhole") surface plot
    Wormhole {
        /// Output image (.png or .svg)
        #[arg(short, long, default_value = "wormhole.png")]
        output: PathBuf,

        /// Also export the surface as binary STL
        #[arg(long)]
        stl: Option<PathBuf>,
    },

    /// Catenoid with toroidal rings around the throat
    Rings {
        /// Output image (.png or .svg)
        #[arg(short, long, default_value = "wormhole_rings.png")]
        output: PathBuf,

        /// Number of rings (overrides the configuration)
        #[arg(long)]
        count: Option<usize>,

        /// Also export the surfaces as binary STL
        #[arg(long)]
        stl: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => SketchConfig::load(path)
            .with_context(|| format!("Failed to load configuration: {:?}", path))?,
        None => SketchConfig::default(),
    };

    match args.command {
        Command::Coil {
            output,
            points,
            subsample,
            field_dump,
        } => {
            if let Some(n) = points {
                config.coil.grid = config.coil.grid.with_count(n);
            }
            if let Some(rate) = subsample {
                config.coil.subsample_rate = rate;
            }

            let scene = CoilScene::compute(&config.coil).context("Field evaluation failed")?;
            render_quiver(&scene, &output)
                .with_context(|| format!("Failed to render quiver plot: {:?}", output))?;

            if let Some(path) = field_dump {
                let total = scene.total_field()?;
                FieldFrame::from_sample(&scene.grid, &total)
                    .write(&path)
                    .with_context(|| format!("Failed to write field frame: {:?}", path))?;
            }
        }

        Command::Wormhole { output, stl } => {
            let scene = WormholeScene::bare(&config.surface).context("Surface sampling failed")?;
            render_surface(&scene, &config.surface, "Wormhole", &output)
                .with_context(|| format!("Failed to render surface plot: {:?}", output))?;

            if let Some(path) = stl {
                write_stl(&scene.mesh(), &path)
                    .with_context(|| format!("Failed to write STL: {:?}", path))?;
            }
        }

        Command::Rings { output, count, stl } => {
            if let Some(n) = count {
                config.surface.rings.count = n;
            }

            let scene = WormholeScene::with_rings(&config.surface).context("Surface sampling failed")?;
            render_surface(&scene, &config.surface, "Wormhole with Toroid Rings", &output)
                .with_context(|| format!("Failed to render surface plot: {:?}", output))?;

            if let Some(path) = stl {
                write_stl(&scene.mesh(), &path)
                    .with_context(|| format!("Failed to write STL: {:?}", path))?;
            }
        }
    }

    info!("Done");
    Ok(())
}
