//! Single-rotation loading and PNG export.

use std::path::{Path, PathBuf};

use fits_parser::DecodedImage;
use renderer::{colorize, create_png, create_png_rgb, normalize, render_rgb, NormalizationSpec};
use solar_common::{CarringtonRotation, ScalarGrid, SolarError, SolarResult};
use tracing::{info, warn};

use crate::archive::DatasetSource;

/// Fetch and decode the magnetogram for `rotation`.
pub async fn load_magnetogram(
    source: &dyn DatasetSource,
    rotation: CarringtonRotation,
) -> SolarResult<DecodedImage> {
    let bytes = source.fetch_bytes(rotation).await?;
    let image = fits_parser::decode_with_report(&bytes)?;
    info!(
        %rotation,
        width = image.grid.width(),
        height = image.grid.height(),
        min = image.grid.observed_min(),
        max = image.grid.observed_max(),
        "Decoded magnetogram"
    );
    Ok(image)
}

/// Write the flat map for `rotation` as `cr<N>_map.png` under `output_dir`.
pub async fn render_map(
    grid: &ScalarGrid,
    spec: &NormalizationSpec,
    rotation: CarringtonRotation,
    output_dir: &Path,
) -> SolarResult<PathBuf> {
    let colorized = colorize(grid, spec);
    if colorized.degenerate {
        warn!(%rotation, "Map rendered from a flat field");
    }
    let png = create_png(
        &colorized.pixels,
        colorized.width as usize,
        colorized.height as usize,
    )
    .map_err(SolarError::Io)?;

    let path = output_dir.join(format!("cr{}_map.png", rotation.number()));
    write_file(&path, &png).await?;
    Ok(path)
}

/// Write the globe texture for `rotation` as `cr<N>_texture.png` (RGB).
pub async fn render_texture(
    grid: &ScalarGrid,
    spec: &NormalizationSpec,
    rotation: CarringtonRotation,
    output_dir: &Path,
) -> SolarResult<PathBuf> {
    let normalized = normalize(grid, spec);
    let png = create_png_rgb(
        &render_rgb(&normalized),
        normalized.width() as usize,
        normalized.height() as usize,
    )
    .map_err(SolarError::Io)?;

    let path = output_dir.join(format!("cr{}_texture.png", rotation.number()));
    write_file(&path, &png).await?;
    Ok(path)
}

pub(crate) async fn write_file(path: &Path, bytes: &[u8]) -> SolarResult<()> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(path, bytes).await?;
    metrics::counter!("frames_written_total").increment(1);
    Ok(())
}
