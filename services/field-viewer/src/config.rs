//! Viewer configuration.
//!
//! Sources are layered: built-in defaults, then an optional YAML file,
//! then `FIELD_VIEWER_*` environment variables, then command-line flags.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use renderer::NormalizationSpec;
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    /// Directory holding magnetograms and coronal models.
    pub archive_dir: PathBuf,
    /// Directory rendered frames are written to.
    pub output_dir: PathBuf,
    pub normalization: NormalizationSpec,
    /// Crossfade length in milliseconds.
    pub transition_ms: u64,
    /// Frames per second during playback.
    pub frame_rate: u32,
    pub log_level: String,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            archive_dir: PathBuf::from("data/archive"),
            output_dir: PathBuf::from("data/frames"),
            normalization: NormalizationSpec::Auto,
            transition_ms: 1500,
            frame_rate: 30,
            log_level: "info".to_string(),
        }
    }
}

impl ViewerConfig {
    /// Defaults, overlaid with `path` when given, then the environment.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config = Self::from_yaml(&text)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        debug!(path = %path.display(), "Loaded viewer config");
        Ok(config)
    }

    pub fn from_yaml(text: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(text)?)
    }

    /// Apply `FIELD_VIEWER_*` variables from the process environment.
    pub fn apply_env(&mut self) -> Result<()> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from any key lookup.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(dir) = lookup("FIELD_VIEWER_ARCHIVE_DIR") {
            self.archive_dir = PathBuf::from(dir);
        }
        if let Some(dir) = lookup("FIELD_VIEWER_OUTPUT_DIR") {
            self.output_dir = PathBuf::from(dir);
        }
        if let Some(ms) = lookup("FIELD_VIEWER_TRANSITION_MS") {
            self.transition_ms = ms
                .trim()
                .parse()
                .with_context(|| format!("Invalid FIELD_VIEWER_TRANSITION_MS '{}'", ms))?;
        }
        if let Some(rate) = lookup("FIELD_VIEWER_FRAME_RATE") {
            self.frame_rate = rate
                .trim()
                .parse()
                .with_context(|| format!("Invalid FIELD_VIEWER_FRAME_RATE '{}'", rate))?;
        }
        if let Some(spec) = lookup("FIELD_VIEWER_NORMALIZATION") {
            self.normalization = spec
                .parse()
                .map_err(|e| anyhow::anyhow!("Invalid FIELD_VIEWER_NORMALIZATION: {}", e))?;
        }
        if let Some(level) = lookup("FIELD_VIEWER_LOG_LEVEL") {
            self.log_level = level;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.frame_rate == 0 {
            return Err("frame_rate must be greater than zero".to_string());
        }
        self.normalization.validate()?;
        Ok(())
    }

    pub fn transition_duration(&self) -> Duration {
        Duration::from_millis(self.transition_ms)
    }

    /// Time between frames at the configured frame rate.
    pub fn frame_interval(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.frame_rate.max(1) as f64)
    }
}
