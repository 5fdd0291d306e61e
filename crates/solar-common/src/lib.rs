//! Common types and utilities shared across the solar field viewer crates.

pub mod carrington;
pub mod error;
pub mod grid;

pub use carrington::CarringtonRotation;
pub use error::{GridError, SolarError, SolarResult};
pub use grid::ScalarGrid;
