//! Animated transitions between consecutive magnetograms.
//!
//! The controller blends raw field values, not colors, so every
//! intermediate frame is itself a plausible field that the normal render
//! pipeline can display. It never reads a clock: callers pass the current
//! `Instant` to every tick.

pub mod controller;
pub mod easing;

pub use controller::{TickOutput, TransitionController, TransitionError, TransitionResult};
pub use easing::{cubic_in_out, linear, Easing};
