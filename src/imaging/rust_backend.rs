//! Pure Rust image processing backend, no system libraries.
//!
//! Everything is statically linked into the binary.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Decode (PNG, JPEG, WebP) | `image` crate (pure Rust decoders) |
//! | Identify | `image::image_dimensions` (header only, no full decode) |
//! | Crop | `image::DynamicImage::crop_imm` |
//! | Resize | `image::DynamicImage::resize_exact` with `Lanczos3` filter |
//! | Encode | `image` PNG / JPEG encoders, chosen by output extension |
//! | Pixel sample | `image::GenericImageView::get_pixel` |

use super::backend::{BackendError, Dimensions, ImageBackend};
use super::calculations::clamp_coordinate;
use super::params::{ResizeParams, Rgb};
use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView, ImageFormat, ImageReader};
use std::path::Path;

/// JPEG quality for `.jpg` outputs. PNG is lossless and ignores it.
const JPEG_QUALITY: u8 = 92;

/// Pure Rust backend using the `image` crate ecosystem.
///
/// See the [module docs](self) for the crate-to-operation mapping.
pub struct RustBackend;

impl RustBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustBackend {
    fn default() -> Self {
        Self::new()
    }
}

/// Load and decode an image from disk.
fn load_image(path: &Path) -> Result<DynamicImage, BackendError> {
    ImageReader::open(path)
        .map_err(BackendError::Io)?
        .with_guessed_format()
        .map_err(BackendError::Io)?
        .decode()
        .map_err(|e| {
            BackendError::ProcessingFailed(format!("Failed to decode {}: {}", path.display(), e))
        })
}

/// Save a DynamicImage to the given path, inferring format from extension.
fn save_image(img: &DynamicImage, path: &Path) -> Result<(), BackendError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    match ext.as_str() {
        "png" => img
            .save_with_format(path, ImageFormat::Png)
            .map_err(|e| BackendError::ProcessingFailed(format!("PNG encode failed: {}", e))),
        "jpg" | "jpeg" => save_jpeg(img, path),
        other => Err(BackendError::ProcessingFailed(format!(
            "Unsupported output format: {}",
            other
        ))),
    }
}

/// JPEG has no alpha channel; flatten to RGB before encoding.
fn save_jpeg(img: &DynamicImage, path: &Path) -> Result<(), BackendError> {
    let file = std::fs::File::create(path).map_err(BackendError::Io)?;
    let writer = std::io::BufWriter::new(file);
    let encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(writer, JPEG_QUALITY);
    DynamicImage::ImageRgb8(img.to_rgb8())
        .write_with_encoder(encoder)
        .map_err(|e| BackendError::ProcessingFailed(format!("JPEG encode failed: {}", e)))
}

impl ImageBackend for RustBackend {
    fn identify(&self, path: &Path) -> Result<Dimensions, BackendError> {
        let (width, height) = image::image_dimensions(path).map_err(|e| {
            BackendError::ProcessingFailed(format!(
                "Failed to read dimensions of {}: {}",
                path.display(),
                e
            ))
        })?;
        Ok(Dimensions { width, height })
    }

    fn resize(&self, params: &ResizeParams) -> Result<(), BackendError> {
        let img = load_image(&params.source)?;

        let cropped = match params.crop {
            Some(c) => {
                if c.x + c.width > img.width() || c.y + c.height > img.height() {
                    return Err(BackendError::ProcessingFailed(format!(
                        "Crop {}x{}+{}+{} outside {}x{} source {}",
                        c.width,
                        c.height,
                        c.x,
                        c.y,
                        img.width(),
                        img.height(),
                        params.source.display()
                    )));
                }
                img.crop_imm(c.x, c.y, c.width, c.height)
            }
            None => img,
        };

        let resized = cropped.resize_exact(params.width, params.height, FilterType::Lanczos3);
        save_image(&resized, &params.output)
    }

    fn sample_pixel(&self, path: &Path, x: u32, y: u32) -> Result<Rgb, BackendError> {
        let img = load_image(path)?;
        if img.width() == 0 || img.height() == 0 {
            return Err(BackendError::ProcessingFailed(format!(
                "Empty image: {}",
                path.display()
            )));
        }
        let (x, y) = clamp_coordinate((x, y), img.dimensions());
        let [r, g, b, _] = img.get_pixel(x, y).0;
        Ok(Rgb(r, g, b))
    }
}
