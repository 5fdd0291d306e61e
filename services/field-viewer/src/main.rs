//! Solar field viewer driver.
//!
//! Reads magnetograms and coronal models from a local archive directory
//! and exercises the viewer core:
//! - Inspect a rotation's datasets
//! - Render a rotation as a flat map (and optionally a globe texture)
//! - Play an eased crossfade between two rotations as PNG frames
//! - Compare two coronal model runs

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use coronal::{compare, DatasetSummary};
use field_viewer::{
    load_magnetogram, play_transition, render_map, render_texture, DatasetSource, LocalArchive,
    Pacing, PlaybackOptions, ViewerConfig,
};
use renderer::NormalizationSpec;
use solar_common::CarringtonRotation;

#[derive(Parser, Debug)]
#[command(name = "field-viewer")]
#[command(about = "Solar magnetic field viewer driver")]
struct Args {
    /// YAML configuration file
    #[arg(long, env = "FIELD_VIEWER_CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Archive directory (overrides config)
    #[arg(long, global = true)]
    archive_dir: Option<PathBuf>,

    /// Output directory for rendered frames (overrides config)
    #[arg(long, global = true)]
    output_dir: Option<PathBuf>,

    /// Normalization: `auto` or `fixed:<min>:<max>` (overrides config)
    #[arg(long, global = true)]
    normalization: Option<NormalizationSpec>,

    /// Log level (overrides config)
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Decode a rotation's magnetogram and summarize its coronal model
    Inspect {
        rotation: CarringtonRotation,
    },
    /// Render a rotation as cr<N>_map.png
    Render {
        rotation: CarringtonRotation,

        /// Also write the RGB globe texture cr<N>_texture.png
        #[arg(long)]
        texture: bool,
    },
    /// Crossfade between two rotations, writing one PNG per frame
    Play {
        from: CarringtonRotation,
        to: CarringtonRotation,

        /// Pace frames in wall-clock time at the frame rate
        #[arg(long)]
        realtime: bool,

        /// Transition length in milliseconds (overrides config)
        #[arg(long)]
        transition_ms: Option<u64>,

        /// Frames per second (overrides config)
        #[arg(long)]
        frame_rate: Option<u32>,
    },
    /// Compare the coronal models of two rotations
    Compare {
        a: CarringtonRotation,
        b: CarringtonRotation,
    },
    /// Print the time span of a Carrington rotation
    Carrington {
        rotation: CarringtonRotation,
    },
}

#[derive(Debug, Serialize)]
struct InspectReport {
    rotation: CarringtonRotation,
    start: DateTime<Utc>,
    width: u32,
    height: u32,
    bitpix: i64,
    bscale: f64,
    bzero: f64,
    observed_min: f64,
    observed_max: f64,
    non_finite: usize,
    coronal: Option<DatasetSummary>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment from .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();

    let mut config = ViewerConfig::load(args.config.as_deref())?;
    if let Some(dir) = args.archive_dir {
        config.archive_dir = dir;
    }
    if let Some(dir) = args.output_dir {
        config.output_dir = dir;
    }
    if let Some(spec) = args.normalization {
        config.normalization = spec;
    }
    if let Some(level) = args.log_level {
        config.log_level = level;
    }
    if let Command::Play {
        transition_ms,
        frame_rate,
        ..
    } = &args.command
    {
        if let Some(ms) = transition_ms {
            config.transition_ms = *ms;
        }
        if let Some(rate) = frame_rate {
            config.frame_rate = *rate;
        }
    }
    config
        .validate()
        .map_err(|e| anyhow::anyhow!("Invalid configuration: {}", e))?;

    // Initialize tracing
    let level = match config.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .with_writer(std::io::stderr)
        .json()
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    info!(
        archive = %config.archive_dir.display(),
        normalization = %config.normalization,
        "Starting field viewer"
    );

    match args.command {
        Command::Inspect { rotation } => {
            let archive = open_archive(&config)?;
            let image = load_magnetogram(&archive, rotation).await?;
            let coronal = if archive.has_coronal(rotation) {
                let dataset = archive.fetch_coronal(rotation).await?;
                Some(DatasetSummary::from_dataset(&dataset))
            } else {
                warn!(%rotation, "No coronal model in archive");
                None
            };

            let report = InspectReport {
                rotation,
                start: rotation.start(),
                width: image.grid.width(),
                height: image.grid.height(),
                bitpix: image.header.encoding.bitpix(),
                bscale: image.header.bscale,
                bzero: image.header.bzero,
                observed_min: image.grid.observed_min(),
                observed_max: image.grid.observed_max(),
                non_finite: image.non_finite,
                coronal,
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Command::Render { rotation, texture } => {
            let archive = open_archive(&config)?;
            let image = load_magnetogram(&archive, rotation).await?;
            let path = render_map(&image.grid, &config.normalization, rotation, &config.output_dir)
                .await?;
            info!(path = %path.display(), "Wrote map");
            if texture {
                let path =
                    render_texture(&image.grid, &config.normalization, rotation, &config.output_dir)
                        .await?;
                info!(path = %path.display(), "Wrote texture");
            }
        }
        Command::Play {
            from, to, realtime, ..
        } => {
            let pacing = if realtime {
                Pacing::Realtime
            } else {
                Pacing::Simulated
            };
            let archive = open_archive(&config)?;
            let options = PlaybackOptions::from_config(&config, pacing);
            let report =
                play_transition(&archive, from, to, &options, &config.output_dir).await?;
            println!(
                "{} frames written to {}",
                report.frames.len(),
                config.output_dir.display()
            );
        }
        Command::Compare { a, b } => {
            let archive = open_archive(&config)?;
            let dataset_a = archive.fetch_coronal(a).await?;
            let dataset_b = archive.fetch_coronal(b).await?;
            let comparison = compare(&dataset_a, &dataset_b);
            println!("{}", serde_json::to_string_pretty(&comparison)?);
        }
        Command::Carrington { rotation } => {
            println!("{}", rotation);
            println!("start:    {}", rotation.start().to_rfc3339());
            println!("midpoint: {}", rotation.midpoint().to_rfc3339());
            println!("end:      {}", rotation.end().to_rfc3339());
        }
    }

    Ok(())
}

fn open_archive(config: &ViewerConfig) -> Result<LocalArchive> {
    LocalArchive::open(&config.archive_dir)
        .with_context(|| format!("Failed to open archive {}", config.archive_dir.display()))
}
