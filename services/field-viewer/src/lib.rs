//! Local driver for the solar field viewer core.
//!
//! Stands in for the browser-side collaborators: datasets come from a
//! directory laid out like the rotation archive, frames are written as PNG
//! files instead of being drawn, and a tokio timer plays the render loop.

pub mod archive;
pub mod config;
pub mod export;
pub mod playback;

pub use archive::{DatasetSource, LocalArchive};
pub use config::ViewerConfig;
pub use export::{load_magnetogram, render_map, render_texture};
pub use playback::{play_transition, Pacing, PlaybackOptions, PlaybackReport};
