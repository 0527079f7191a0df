//! # mobile-assets
//!
//! Generates the icon and splash screen assets of a React Native project from
//! two source images. One square icon and one large splash image become every
//! density bucket, asset-catalog slot and store listing graphic Android and
//! iOS expect, plus the small resource and descriptor edits that wire them up.
//!
//! # Architecture: Plan, Fan Out, Join
//!
//! ```text
//! CLI flags + mobile-assets.toml  →  RunConfig      (validated once, immutable)
//! RunConfig                       →  [Task]         (eligible platform/kind pairs)
//! Task × size table               →  output files   (one worker thread per task)
//! ```
//!
//! Every task is independent: its destination paths never overlap another
//! task's, so tasks share nothing but the read-only config and the image
//! backend. A failing task does not stop the others; the run reports every
//! failure once all tasks have finished.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`config`] | `mobile-assets.toml` loading, CLI overrides, validation → [`config::RunConfig`] |
//! | [`pipeline`] | Task planning, concurrent execution, per-task timeout, failure aggregation |
//! | [`tables`] | Static per-platform table rows: sizes, destinations, catalog metadata |
//! | [`imaging`] | Image backend trait, crop math, resize/encode, background color sampling |
//! | [`render`] | Android resource templates, `Contents.json`, pbxproj / Info.plist patches |
//! | [`types`] | Shared value types (`Platform`, `AssetKind`, `Orientation`, ...) |
//! | [`output`] | CLI output formatting for plans, reports and failures |
//! | [`logging`] | `tracing` subscriber setup |
//!
//! # Design Decisions
//!
//! ## Static Size Tables
//!
//! Every output file is one row in a `static` slice in [`tables`]. Sizes,
//! destinations and asset-catalog metadata live side by side, and the
//! `Contents.json` manifests are generated from the same rows that produced
//! the images. Adding a device size is a one-line change.
//!
//! ## Pure-Rust Imaging
//!
//! The [`imaging`] module uses the `image` crate (Lanczos3 resampling) behind
//! the [`imaging::ImageBackend`] trait. There is nothing to install besides the
//! binary, and tests swap in a recording mock backend.
//!
//! ## Idempotent Descriptor Patches
//!
//! The iOS splash task edits `project.pbxproj` and `Info.plist` in place. Each
//! patch recognises its own previous application, so re-running the generator
//! leaves those files exactly as the first run did.

pub mod config;
pub mod imaging;
pub mod logging;
pub mod output;
pub mod pipeline;
pub mod render;
pub mod tables;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
