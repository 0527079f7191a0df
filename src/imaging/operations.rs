//! High-level image operations.
//!
//! These functions combine calculations with backend execution.
//! They take a table row, compute parameters, and call the backend.

use super::backend::{BackendError, ImageBackend};
use super::calculations::{center_crop, is_full_frame};
use super::params::{CropRegion, ResizeParams, SampledColor};
use crate::tables::{DestinationContext, Fit, SpecRow};
use std::path::{Path, PathBuf};

/// Result type for image operations.
pub type Result<T> = std::result::Result<T, BackendError>;

/// Pixel the background color is read from: one in from the top-left corner,
/// clear of edge artifacts.
pub const BACKGROUND_SAMPLE_POINT: (u32, u32) = (1, 1);

/// A table row bound to a concrete source and output file.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedAsset {
    pub slot_name: &'static str,
    pub source: PathBuf,
    pub target_width: u32,
    pub target_height: u32,
    /// Region of the source kept before scaling; `None` means the whole image.
    pub crop: Option<CropRegion>,
    pub destination: PathBuf,
}

/// Bind a table row to a source image.
///
/// Stretch rows never touch the backend. Center-crop rows identify the
/// source to compute the crop region.
pub fn resolve(
    backend: &impl ImageBackend,
    source: &Path,
    row: &SpecRow,
    ctx: &DestinationContext,
) -> Result<ResolvedAsset> {
    let crop = match row.fit {
        Fit::Stretch => None,
        Fit::CenterCrop => {
            let dims = backend.identify(source)?;
            let source_dims = (dims.width, dims.height);
            let region = center_crop(source_dims, (row.width, row.height));
            (!is_full_frame(&region, source_dims)).then_some(region)
        }
    };

    Ok(ResolvedAsset {
        slot_name: row.slot_name,
        source: source.to_path_buf(),
        target_width: row.width,
        target_height: row.height,
        crop,
        destination: ctx.path(row.destination),
    })
}

/// Write a resolved asset, creating parent directories as needed.
///
/// Overwrites whatever is already at the destination.
pub fn write_asset(backend: &impl ImageBackend, asset: &ResolvedAsset) -> Result<()> {
    if let Some(parent) = asset.destination.parent() {
        std::fs::create_dir_all(parent)?;
    }
    backend.resize(&ResizeParams {
        source: asset.source.clone(),
        output: asset.destination.clone(),
        crop: asset.crop,
        width: asset.target_width,
        height: asset.target_height,
    })
}

/// Sample the splash background color at [`BACKGROUND_SAMPLE_POINT`].
pub fn sample_background_color(
    backend: &impl ImageBackend,
    splash: &Path,
) -> Result<SampledColor> {
    let (x, y) = BACKGROUND_SAMPLE_POINT;
    let rgb = backend.sample_pixel(splash, x, y)?;
    Ok(SampledColor {
        hex: rgb.to_hex(),
        source_coordinate: BACKGROUND_SAMPLE_POINT,
    })
}
