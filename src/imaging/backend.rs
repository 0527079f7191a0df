//! Image processing backend trait and shared types.
//!
//! The [`ImageBackend`] trait defines the three operations every backend must
//! support: identify, resize (with optional crop) and pixel sampling. That is
//! the whole surface the pipeline needs from a raster library.
//!
//! The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend), built on the `image`
//! crate. Everything is statically linked into the binary.

use super::params::{ResizeParams, Rgb};
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Processing failed: {0}")]
    ProcessingFailed(String),
}

/// Result of an identify operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

/// Trait for image processing backends.
///
/// Tasks run on separate worker threads and share one backend, hence the
/// `Send + Sync` bound.
pub trait ImageBackend: Send + Sync {
    /// Get image dimensions.
    fn identify(&self, path: &Path) -> Result<Dimensions, BackendError>;

    /// Crop (if requested), scale to the exact target size and encode to
    /// `params.output`. The output's parent directory must exist.
    fn resize(&self, params: &ResizeParams) -> Result<(), BackendError>;

    /// Read the color of the pixel at `(x, y)`.
    fn sample_pixel(&self, path: &Path, x: u32, y: u32) -> Result<Rgb, BackendError>;
}
