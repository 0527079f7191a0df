//! Parameter types for image operations.
//!
//! These structs describe *what* to do, not *how* to do it. They are the
//! interface between the high-level [`operations`](super::operations) module
//! (which decides what images to create) and the [`backend`](super::backend)
//! (which does the actual pixel work). This separation allows swapping backends
//! (e.g. for testing with a mock) without changing operation logic.
//!
//! ## Types
//!
//! - [`CropRegion`] - Rectangle cut out of the source before scaling.
//! - [`ResizeParams`] - Everything needed to write one output file: source, output path, optional crop, exact target dimensions.
//! - [`Rgb`] - A single sampled pixel, without alpha.
//! - [`SampledColor`] - A pixel reading bound to the coordinate it came from.

use std::fmt;
use std::path::PathBuf;

/// Rectangle in source-image pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropRegion {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Parameters for producing one output image.
///
/// When `crop` is set the backend cuts that region out first, then scales it
/// to exactly `width × height`. Without a crop the whole source is scaled to
/// `width × height`, ignoring its aspect ratio.
#[derive(Debug, Clone, PartialEq)]
pub struct ResizeParams {
    pub source: PathBuf,
    pub output: PathBuf,
    pub crop: Option<CropRegion>,
    pub width: u32,
    pub height: u32,
}

/// An opaque 8-bit RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    /// `#rrggbb`, lowercase.
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// Color read from a single pixel of a source image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SampledColor {
    pub hex: String,
    pub source_coordinate: (u32, u32),
}
