//! Crossfade playback between two rotations.
//!
//! Plays the role of the render loop: ticks a [`TransitionController`]
//! once per frame and writes every frame as a PNG. Frames are timed by a
//! simulated clock for deterministic export, or by a tokio interval when
//! watching in real time.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crossfade::TransitionController;
use renderer::{colorize, create_png, resolve_bounds, Bounds, NormalizationSpec};
use solar_common::{CarringtonRotation, ScalarGrid, SolarError, SolarResult};
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

use crate::archive::DatasetSource;
use crate::config::ViewerConfig;
use crate::export::{load_magnetogram, write_file};

/// Frame spacing floor; keeps the frame clock advancing at any frame rate.
const MIN_FRAME_INTERVAL: Duration = Duration::from_millis(1);

/// How frame timestamps are produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pacing {
    /// Frame `i` is stamped `start + i * frame_interval`; no waiting.
    Simulated,
    /// Frames are paced by a tokio interval at the frame rate.
    Realtime,
}

#[derive(Debug, Clone)]
pub struct PlaybackOptions {
    pub duration: Duration,
    pub frame_interval: Duration,
    pub normalization: NormalizationSpec,
    pub pacing: Pacing,
}

impl PlaybackOptions {
    pub fn from_config(config: &ViewerConfig, pacing: Pacing) -> Self {
        Self {
            duration: config.transition_duration(),
            frame_interval: config.frame_interval(),
            normalization: config.normalization,
            pacing,
        }
    }
}

#[derive(Debug, Clone)]
pub struct PlaybackReport {
    /// Written frames in order; the last one shows the target rotation.
    pub frames: Vec<PathBuf>,
    /// Eased blend weight of each frame.
    pub weights: Vec<f64>,
    /// Normalization applied to every frame.
    pub normalization: NormalizationSpec,
}

/// Normalization shared by all frames of a transition.
///
/// Auto bounds are widened to cover both endpoints so the color scale
/// holds still while the data moves.
pub fn playback_normalization(
    previous: &ScalarGrid,
    next: &ScalarGrid,
    spec: &NormalizationSpec,
) -> NormalizationSpec {
    match spec {
        NormalizationSpec::Auto => {
            let bounds: Bounds = resolve_bounds(previous, spec).union(&resolve_bounds(next, spec));
            if bounds.is_degenerate() {
                NormalizationSpec::Auto
            } else {
                NormalizationSpec::fixed(bounds.min, bounds.max)
            }
        }
        fixed => *fixed,
    }
}

/// Crossfade from `from` to `to`, writing frames into `output_dir`.
pub async fn play_transition(
    source: &dyn DatasetSource,
    from: CarringtonRotation,
    to: CarringtonRotation,
    options: &PlaybackOptions,
    output_dir: &Path,
) -> SolarResult<PlaybackReport> {
    let previous = Arc::new(load_magnetogram(source, from).await?.grid);
    let next = Arc::new(load_magnetogram(source, to).await?.grid);
    let spec = playback_normalization(&previous, &next, &options.normalization);

    let mut controller = TransitionController::new();
    controller.show(Arc::clone(&previous));

    let start = Instant::now();
    controller.begin_transition(previous, next, options.duration, start)?;

    let step = options.frame_interval.max(MIN_FRAME_INTERVAL);
    let mut interval = match options.pacing {
        Pacing::Realtime => {
            let mut interval = tokio::time::interval(step);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            Some(interval)
        }
        Pacing::Simulated => None,
    };

    let mut frames = Vec::new();
    let mut weights = Vec::new();
    let mut index: u32 = 0;
    loop {
        let now = match interval.as_mut() {
            Some(interval) => interval.tick().await.into_std(),
            None => start + step * index,
        };

        let frame = controller.tick(now);
        let grid = frame.grid.ok_or_else(|| {
            SolarError::Transition("controller has no grid to display".to_string())
        })?;
        let colorized = colorize(grid, &spec);
        let (weight, is_complete) = (frame.weight, frame.is_complete);

        let png = create_png(
            &colorized.pixels,
            colorized.width as usize,
            colorized.height as usize,
        )
        .map_err(SolarError::Io)?;
        let path = output_dir.join(format!(
            "cr{}_cr{}_{:04}.png",
            from.number(),
            to.number(),
            index
        ));
        write_file(&path, &png).await?;
        debug!(index, weight, path = %path.display(), "Wrote frame");

        frames.push(path);
        weights.push(weight);
        if is_complete {
            break;
        }
        index += 1;
    }

    info!(
        %from,
        %to,
        frames = frames.len(),
        duration_ms = options.duration.as_millis() as u64,
        "Playback finished"
    );
    Ok(PlaybackReport {
        frames,
        weights,
        normalization: spec,
    })
}
