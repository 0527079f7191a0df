//! Image processing, pure Rust on top of the `image` crate.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Identify** | `image::image_dimensions` |
//! | **Crop + resize** | `crop_imm` + `resize_exact` (Lanczos3) |
//! | **Encode** | PNG / JPEG by output extension |
//! | **Sample color** | single-pixel read at (1,1) |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for crop math (unit testable)
//! - **Parameters**: Data structures describing image operations
//! - **Backend**: [`ImageBackend`] trait + [`RustBackend`]
//! - **Operations**: Dimension resolver, asset writer and color sampler

pub mod backend;
mod calculations;
pub mod operations;
mod params;
pub mod rust_backend;

pub use backend::{BackendError, Dimensions, ImageBackend};
pub use calculations::center_crop;
pub use operations::{
    BACKGROUND_SAMPLE_POINT, ResolvedAsset, resolve, sample_background_color, write_asset,
};
pub use params::{CropRegion, ResizeParams, Rgb, SampledColor};
pub use rust_backend::RustBackend;
