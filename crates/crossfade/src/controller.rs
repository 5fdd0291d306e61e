//! Transition state machine.
//!
//! ```text
//!            begin_transition            tick (elapsed >= duration)
//!   Idle ───────────────────────▶ Active ───────────────────────────▶ Idle
//!                                  │  ▲        cancel / show
//!                                  └──┘ begin_transition (supersede)
//! ```
//!
//! An active transition owns one clone of each endpoint grid plus a
//! scratch buffer for the blended frame. Leaving `Active` by any path
//! drops all three, so a superseded or finished transition holds no
//! memory.

use std::sync::Arc;
use std::time::{Duration, Instant};

use solar_common::{GridError, ScalarGrid, SolarError};
use thiserror::Error;
use tracing::{debug, warn};

use crate::easing::{cubic_in_out, Easing};

/// Result type for transition operations.
pub type TransitionResult<T> = Result<T, TransitionError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransitionError {
    /// Grids of different dimensions cannot be blended sample by sample.
    #[error(
        "cannot blend a {}x{} grid into a {}x{} grid",
        .previous.0, .previous.1, .next.0, .next.1
    )]
    ShapeMismatch {
        previous: (u32, u32),
        next: (u32, u32),
    },
}

impl TransitionError {
    pub fn code(&self) -> &'static str {
        match self {
            TransitionError::ShapeMismatch { .. } => "ShapeMismatch",
        }
    }
}

impl From<TransitionError> for SolarError {
    fn from(err: TransitionError) -> Self {
        SolarError::Transition(err.to_string())
    }
}

/// One frame of output from [`TransitionController::tick`].
#[derive(Debug, Clone, Copy)]
pub struct TickOutput<'a> {
    /// Grid to display; `None` until a dataset has been shown.
    pub grid: Option<&'a ScalarGrid>,
    /// Linear fraction of the duration elapsed, in `[0, 1]`.
    pub progress: f64,
    /// Eased blend weight applied to the frame, in `[0, 1]`.
    pub weight: f64,
    /// True once the displayed grid is the transition target.
    pub is_complete: bool,
}

#[derive(Debug)]
enum TransitionState {
    Idle {
        current: Option<Arc<ScalarGrid>>,
    },
    Active(ActiveTransition),
}

#[derive(Debug)]
struct ActiveTransition {
    previous: Arc<ScalarGrid>,
    next: Arc<ScalarGrid>,
    start: Instant,
    duration: Duration,
    scratch: Option<ScalarGrid>,
}

impl ActiveTransition {
    fn progress(&self, now: Instant) -> f64 {
        if self.duration.is_zero() {
            return 1.0;
        }
        let elapsed = now.saturating_duration_since(self.start);
        (elapsed.as_secs_f64() / self.duration.as_secs_f64()).clamp(0.0, 1.0)
    }

    fn is_finished(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.start) >= self.duration
    }

    /// Blend the endpoints into the scratch grid, reusing its allocation.
    fn blend(&mut self, weight: f64) -> Result<(), GridError> {
        let mut values = match self.scratch.take() {
            Some(grid) => grid.into_values(),
            None => Vec::with_capacity(self.next.len()),
        };
        values.clear();

        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        for (&a, &b) in self.previous.values().iter().zip(self.next.values()) {
            let v = a * (1.0 - weight) + b * weight;
            min = min.min(v);
            max = max.max(v);
            values.push(v);
        }

        let (width, height) = self.next.dimensions();
        self.scratch = Some(ScalarGrid::with_range(width, height, values, min, max)?);
        Ok(())
    }
}

/// Drives eased crossfades between successive grids.
///
/// The controller is tick-driven and owns no timer; the render loop calls
/// [`tick`](Self::tick) once per frame with a non-decreasing `Instant`.
#[derive(Debug)]
pub struct TransitionController {
    state: TransitionState,
    easing: Easing,
}

impl Default for TransitionController {
    fn default() -> Self {
        Self::new()
    }
}

impl TransitionController {
    /// An idle controller with cubic ease-in-out.
    pub fn new() -> Self {
        Self::with_easing(cubic_in_out)
    }

    pub fn with_easing(easing: Easing) -> Self {
        Self {
            state: TransitionState::Idle { current: None },
            easing,
        }
    }

    /// Start blending from `old` to `new` over `duration`.
    ///
    /// An in-flight transition is superseded: its grids and scratch buffer
    /// are released before this call returns. On a shape mismatch the
    /// controller is left exactly as it was.
    pub fn begin_transition(
        &mut self,
        old: Arc<ScalarGrid>,
        new: Arc<ScalarGrid>,
        duration: Duration,
        now: Instant,
    ) -> TransitionResult<()> {
        if !old.same_shape(&new) {
            return Err(TransitionError::ShapeMismatch {
                previous: old.dimensions(),
                next: new.dimensions(),
            });
        }

        if self.is_active() {
            debug!("Superseding in-flight transition");
            metrics::counter!("transition_superseded_total").increment(1);
        }

        debug!(
            width = new.width(),
            height = new.height(),
            duration_ms = duration.as_millis() as u64,
            "Transition started"
        );
        metrics::counter!("transition_started_total").increment(1);

        // Replacing the state drops the superseded transition's grids.
        self.state = TransitionState::Active(ActiveTransition {
            previous: old,
            next: new,
            start: now,
            duration,
            scratch: None,
        });
        Ok(())
    }

    /// Advance to `now` and return the frame to display.
    ///
    /// A `now` earlier than the transition start counts as no time elapsed.
    pub fn tick(&mut self, now: Instant) -> TickOutput<'_> {
        if let TransitionState::Active(active) = &self.state {
            if active.is_finished(now) {
                self.complete();
            }
        }

        match &mut self.state {
            TransitionState::Idle { current } => TickOutput {
                grid: current.as_deref(),
                progress: 1.0,
                weight: 1.0,
                is_complete: true,
            },
            TransitionState::Active(active) => {
                let progress = active.progress(now);
                let weight = (self.easing)(progress).clamp(0.0, 1.0);
                let grid = match active.blend(weight) {
                    Ok(_) => active.scratch.as_ref(),
                    Err(e) => {
                        warn!(error = %e, "Blend failed, showing transition target");
                        Some(active.next.as_ref())
                    }
                };
                TickOutput {
                    grid,
                    progress,
                    weight,
                    is_complete: false,
                }
            }
        }
    }

    /// Display `grid` immediately, cancelling any active transition.
    pub fn show(&mut self, grid: Arc<ScalarGrid>) {
        if self.is_active() {
            debug!("Transition replaced by direct show");
        }
        self.state = TransitionState::Idle {
            current: Some(grid),
        };
    }

    /// Jump to the end of an active transition. No-op when idle.
    pub fn cancel(&mut self) {
        if let TransitionState::Active(active) = &self.state {
            debug!(width = active.next.width(), "Transition cancelled");
            let next = Arc::clone(&active.next);
            self.state = TransitionState::Idle {
                current: Some(next),
            };
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self.state, TransitionState::Active(_))
    }

    /// The grid currently shown, or the target of an active transition.
    pub fn current(&self) -> Option<Arc<ScalarGrid>> {
        match &self.state {
            TransitionState::Idle { current } => current.clone(),
            TransitionState::Active(active) => Some(Arc::clone(&active.next)),
        }
    }

    fn complete(&mut self) {
        let state = std::mem::replace(&mut self.state, TransitionState::Idle { current: None });
        self.state = match state {
            TransitionState::Active(ActiveTransition { next, .. }) => {
                debug!("Transition completed");
                metrics::counter!("transition_completed_total").increment(1);
                TransitionState::Idle {
                    current: Some(next),
                }
            }
            idle => idle,
        };
    }
}
