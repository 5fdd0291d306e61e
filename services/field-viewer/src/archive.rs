//! Dataset sources indexed by Carrington rotation.
//!
//! The local archive mirrors the remote one: magnetograms are FITS files
//! whose name carries the rotation number (`hmi.Synoptic_Mr_small.2240.fits`)
//! and coronal models are `cr2240_coronal.json`.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use bytes::Bytes;
use coronal::CoronalDataset;
use solar_common::{CarringtonRotation, SolarError, SolarResult};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// Where the viewer gets datasets from.
#[async_trait]
pub trait DatasetSource: Send + Sync {
    /// Raw magnetogram bytes for `rotation`.
    async fn fetch_bytes(&self, rotation: CarringtonRotation) -> SolarResult<Bytes>;

    /// Validated coronal model for `rotation`.
    async fn fetch_coronal(&self, rotation: CarringtonRotation) -> SolarResult<CoronalDataset>;

    /// Rotations with a magnetogram available, ascending.
    fn rotations(&self) -> Vec<CarringtonRotation>;
}

#[derive(Debug, Default, Clone)]
struct ArchiveEntry {
    magnetogram: Option<PathBuf>,
    coronal: Option<PathBuf>,
}

/// A directory tree of archive files.
#[derive(Debug)]
pub struct LocalArchive {
    root: PathBuf,
    entries: BTreeMap<u32, ArchiveEntry>,
}

impl LocalArchive {
    /// Index every recognizable file under `root`.
    pub fn open(root: impl AsRef<Path>) -> SolarResult<Self> {
        let root = root.as_ref().to_path_buf();
        if !root.is_dir() {
            return Err(SolarError::DatasetNotFound(format!(
                "archive directory {} does not exist",
                root.display()
            )));
        }

        let mut entries: BTreeMap<u32, ArchiveEntry> = BTreeMap::new();
        for entry in WalkDir::new(&root).follow_links(true).sort_by_file_name() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!(error = %e, "Skipping unreadable archive entry");
                    continue;
                }
            };
            if !entry.file_type().is_file() {
                continue;
            }
            let Some(name) = entry.file_name().to_str() else {
                continue;
            };

            if let Some(rotation) = coronal_rotation(name) {
                let slot = &mut entries.entry(rotation).or_default().coronal;
                if slot.is_none() {
                    *slot = Some(entry.path().to_path_buf());
                }
            } else if let Some(rotation) = magnetogram_rotation(name) {
                let slot = &mut entries.entry(rotation).or_default().magnetogram;
                if slot.is_none() {
                    *slot = Some(entry.path().to_path_buf());
                } else {
                    debug!(
                        rotation,
                        ignored = %entry.path().display(),
                        "Duplicate magnetogram for rotation"
                    );
                }
            }
        }

        info!(
            root = %root.display(),
            rotations = entries.len(),
            "Indexed local archive"
        );
        Ok(Self { root, entries })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn magnetogram_path(&self, rotation: CarringtonRotation) -> Option<&Path> {
        self.entries
            .get(&rotation.number())
            .and_then(|e| e.magnetogram.as_deref())
    }

    pub fn coronal_path(&self, rotation: CarringtonRotation) -> Option<&Path> {
        self.entries
            .get(&rotation.number())
            .and_then(|e| e.coronal.as_deref())
    }

    pub fn has_coronal(&self, rotation: CarringtonRotation) -> bool {
        self.coronal_path(rotation).is_some()
    }
}

#[async_trait]
impl DatasetSource for LocalArchive {
    async fn fetch_bytes(&self, rotation: CarringtonRotation) -> SolarResult<Bytes> {
        let path = self.magnetogram_path(rotation).ok_or_else(|| {
            SolarError::DatasetNotFound(format!("no magnetogram for {}", rotation))
        })?;
        let data = tokio::fs::read(path).await?;
        debug!(%rotation, path = %path.display(), bytes = data.len(), "Read magnetogram");
        metrics::counter!("archive_reads_total").increment(1);
        Ok(Bytes::from(data))
    }

    async fn fetch_coronal(&self, rotation: CarringtonRotation) -> SolarResult<CoronalDataset> {
        let path = self.coronal_path(rotation).ok_or_else(|| {
            SolarError::DatasetNotFound(format!("no coronal model for {}", rotation))
        })?;
        let data = tokio::fs::read(path).await?;
        debug!(%rotation, path = %path.display(), bytes = data.len(), "Read coronal model");
        metrics::counter!("archive_reads_total").increment(1);
        Ok(coronal::from_slice(&data)?)
    }

    fn rotations(&self) -> Vec<CarringtonRotation> {
        self.entries
            .iter()
            .filter(|(_, e)| e.magnetogram.is_some())
            .filter_map(|(n, _)| CarringtonRotation::new(*n))
            .collect()
    }
}

/// Rotation of a `cr<N>_coronal.json` file name.
fn coronal_rotation(name: &str) -> Option<u32> {
    let lower = name.to_ascii_lowercase();
    let digits = lower.strip_prefix("cr")?.strip_suffix("_coronal.json")?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok().filter(|&n| n > 0)
}

/// Rotation of a magnetogram file name: the last run of digits in a
/// `.fits` name.
fn magnetogram_rotation(name: &str) -> Option<u32> {
    let lower = name.to_ascii_lowercase();
    let stem = lower
        .strip_suffix(".fits")
        .or_else(|| lower.strip_suffix(".fts"))?;
    stem.split(|c: char| !c.is_ascii_digit())
        .filter(|run| !run.is_empty())
        .last()
        .and_then(|run| run.parse().ok())
        .filter(|&n| n > 0)
}
