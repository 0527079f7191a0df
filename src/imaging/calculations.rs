//! Pure calculation functions for image dimensions.
//!
//! All functions here are pure and testable without any I/O or images.

use super::params::CropRegion;

/// Largest centered rectangle of `source` with the aspect ratio of `target`.
///
/// Cropping to this region before scaling to `target` fills the whole target
/// without letterboxing: the excess of the source along one axis is split
/// evenly between both sides.
///
/// # Arguments
/// * `source` - Original image dimensions (width, height)
/// * `target` - Output dimensions (width, height)
///
/// # Examples
/// ```
/// # use mobile_assets::imaging::center_crop;
/// // 1000x1000 → 9:16 portrait: keep full height, trim the sides
/// let crop = center_crop((1000, 1000), (1080, 1920));
/// assert_eq!((crop.x, crop.y, crop.width, crop.height), (218, 0, 563, 1000));
/// ```
pub fn center_crop(source: (u32, u32), target: (u32, u32)) -> CropRegion {
    let (src_w, src_h) = source;
    let (tgt_w, tgt_h) = target;

    // Compare aspect ratios with integer cross-multiplication
    let src_wide = src_w as u64 * tgt_h as u64;
    let tgt_wide = tgt_w as u64 * src_h as u64;

    let (width, height) = if src_wide > tgt_wide {
        // Source is wider: keep full height, trim width
        let w = (src_h as f64 * tgt_w as f64 / tgt_h as f64).round() as u32;
        (w.clamp(1, src_w), src_h)
    } else if src_wide < tgt_wide {
        // Source is taller: keep full width, trim height
        let h = (src_w as f64 * tgt_h as f64 / tgt_w as f64).round() as u32;
        (src_w, h.clamp(1, src_h))
    } else {
        (src_w, src_h)
    };

    CropRegion {
        x: (src_w - width) / 2,
        y: (src_h - height) / 2,
        width,
        height,
    }
}

/// Whether a crop region covers the whole source, i.e. is a no-op.
pub fn is_full_frame(crop: &CropRegion, source: (u32, u32)) -> bool {
    crop.x == 0 && crop.y == 0 && (crop.width, crop.height) == source
}

/// Clamp a sampling coordinate into an image of the given size.
pub fn clamp_coordinate(point: (u32, u32), size: (u32, u32)) -> (u32, u32) {
    (
        point.0.min(size.0.saturating_sub(1)),
        point.1.min(size.1.saturating_sub(1)),
    )
}
