//! Run configuration.
//!
//! A run is configured in three layers, later layers winning:
//!
//! ```text
//! stock defaults  →  <project>/mobile-assets.toml  →  CLI flags
//! ```
//!
//! The result is a single [`RunConfig`]: validated once, immutable, and
//! shared read-only by every generation task.
//!
//! ## Config File
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! assets_output_path = "."      # Root the ios/ and android/ trees are written under
//! android_src_directory = "main" # Android source set under android/app/src/
//! ios_asset_name = "AppIcon"    # Name of the iOS app icon set
//! orientation = "all"           # Splash orientations: portrait, landscape or all
//! store = false                 # Also generate store listing images
//!
//! [processing]
//! task_timeout_secs = 300       # Per-task time limit
//! ```
//!
//! Unknown keys are rejected to catch typos early.
//!
//! ## Validation vs. recovery
//!
//! Problems that make the whole run meaningless (no project name, invalid
//! TOML, a bad directory name) are [`ConfigError`]s and abort before any file
//! is written. Problems that only remove part of the work are recorded as
//! [`Notice`]s and logged: a missing source image drops the tasks that need it,
//! an unknown orientation falls back to `all`.

use crate::tables::DestinationContext;
use crate::types::{AssetKind, Orientation, PlatformSelection};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Name of the optional per-project config file.
pub const CONFIG_FILENAME: &str = "mobile-assets.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
    #[error("Could not read project name from {}: {reason}. Are you inside a React Native project?", .path.display())]
    ProjectDescriptor { path: PathBuf, reason: String },
}

// =============================================================================
// File config
// =============================================================================

/// Settings loaded from `mobile-assets.toml`.
///
/// All fields have defaults; a config file only lists what it overrides.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    /// Root directory the `ios/` and `android/` trees are written under.
    pub assets_output_path: String,
    /// Android source set under `android/app/src/`.
    pub android_src_directory: String,
    /// Name of the iOS app icon set (`<name>.appiconset`).
    pub ios_asset_name: String,
    /// Splash orientations. Kept as a string so bad values can be recovered.
    pub orientation: String,
    /// Generate store listing images.
    pub store: bool,
    /// Task execution settings.
    pub processing: ProcessingConfig,
}

impl Default for FileConfig {
    fn default() -> Self {
        Self {
            assets_output_path: ".".to_string(),
            android_src_directory: "main".to_string(),
            ios_asset_name: "AppIcon".to_string(),
            orientation: "all".to_string(),
            store: false,
            processing: ProcessingConfig::default(),
        }
    }
}

/// Task execution settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Seconds a single generation task may run before it is reported as timed out.
    pub task_timeout_secs: u64,
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self {
            task_timeout_secs: 300,
        }
    }
}

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the canonical representation of all default values, used as the
/// base layer for merging user overrides on top.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(FileConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load `mobile-assets.toml` from a directory as a raw TOML value.
///
/// Returns `Ok(None)` if the file does not exist.
pub fn load_raw_config(dir: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = dir.join(CONFIG_FILENAME);
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Load the project's config file merged over stock defaults.
pub fn load_config(dir: &Path) -> Result<FileConfig, ConfigError> {
    let base = stock_defaults_value();
    let merged = match load_raw_config(dir)? {
        Some(overlay) => merge_toml(base, overlay),
        None => base,
    };
    Ok(merged.try_into()?)
}

/// Returns a fully-commented stock `mobile-assets.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# mobile-assets configuration
# ===========================
# All settings are optional. Values shown below are the defaults.
# Command-line flags override anything set here.
# Unknown keys will cause an error.

# Root directory the ios/ and android/ trees are written under.
assets_output_path = "."

# Android source set the resources go into (android/app/src/<dir>/res).
android_src_directory = "main"

# Name of the iOS app icon set (ios/<project>/Images.xcassets/<name>.appiconset).
ios_asset_name = "AppIcon"

# Splash screen orientations: "portrait", "landscape" or "all".
orientation = "all"

# Also generate Play Store / App Store listing images.
store = false

# ---------------------------------------------------------------------------
# Processing
# ---------------------------------------------------------------------------
[processing]
# Seconds a single generation task (e.g. "Android splash") may run.
task_timeout_secs = 300
"##
}

// =============================================================================
// Command-line options
// =============================================================================

/// Options collected from the command line. `None` means "not given".
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub icon: Option<PathBuf>,
    pub splash: Option<PathBuf>,
    pub notification_icon: Option<PathBuf>,
    pub android: bool,
    pub ios: bool,
    pub store: bool,
    pub project_name: Option<String>,
    pub assets_output_path: Option<PathBuf>,
    pub android_src_directory: Option<String>,
    pub ios_asset_name: Option<String>,
    pub orientation: Option<String>,
    pub portrait: bool,
    pub landscape: bool,
    pub task_timeout_secs: Option<u64>,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            icon: None,
            splash: None,
            notification_icon: None,
            android: false,
            ios: false,
            store: false,
            project_name: None,
            assets_output_path: None,
            android_src_directory: None,
            ios_asset_name: None,
            orientation: None,
            portrait: true,
            landscape: true,
            task_timeout_secs: None,
        }
    }
}

// =============================================================================
// Validated run config
// =============================================================================

/// Source images that exist on disk. Absent means "skip what needs it".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssetSources {
    pub icon: Option<PathBuf>,
    pub splash: Option<PathBuf>,
    pub notification_icon: Option<PathBuf>,
}

impl AssetSources {
    /// Source image for an asset kind. Store listings reuse the other sources.
    pub fn get(&self, kind: AssetKind) -> Option<&Path> {
        match kind {
            AssetKind::Icon => self.icon.as_deref(),
            AssetKind::Splash => self.splash.as_deref(),
            AssetKind::NotificationIcon => self.notification_icon.as_deref(),
            AssetKind::StoreListing => None,
        }
    }
}

/// A recovered configuration problem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// A source image option points at nothing; the asset is treated as absent.
    AssetNotFound { option: &'static str, path: PathBuf },
    /// Unknown orientation string, replaced by `all`.
    InvalidOrientation(String),
    /// `--portrait` / `--landscape` would exclude every splash row; ignored.
    OrientationSwitchesIgnored(Orientation),
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::AssetNotFound { option, path } => {
                write!(f, "{option} could not be found: {}", path.display())
            }
            Notice::InvalidOrientation(value) => write!(
                f,
                "The orientation should be one of the following values: portrait, landscape or all (got {value:?}); using all"
            ),
            Notice::OrientationSwitchesIgnored(orientation) => write!(
                f,
                "--portrait/--landscape exclude every {orientation} splash; keeping {orientation}"
            ),
        }
    }
}

/// The single validated configuration value for a run.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub project_name: String,
    /// The React Native project; `ios/` descriptors are patched here.
    pub project_root: PathBuf,
    /// Where generated images and resources are written.
    pub output_root: PathBuf,
    pub android_src_dir: String,
    pub ios_asset_name: String,
    pub platforms: PlatformSelection,
    pub orientation: Orientation,
    pub store: bool,
    pub assets: AssetSources,
    pub task_timeout: Duration,
    /// Recovered problems, already logged.
    pub notices: Vec<Notice>,
}

impl RunConfig {
    /// Load the project's config file and combine it with CLI options.
    pub fn load(project_dir: &Path, opts: &RunOptions) -> Result<Self, ConfigError> {
        let file = load_config(project_dir)?;
        Self::resolve(project_dir, opts, &file)
    }

    /// Combine file config and CLI options into a validated run config.
    ///
    /// Missing source images and bad orientations are recovered (see
    /// [`Notice`]); everything else invalid is a [`ConfigError`].
    pub fn resolve(
        project_dir: &Path,
        opts: &RunOptions,
        file: &FileConfig,
    ) -> Result<Self, ConfigError> {
        let project_name = match &opts.project_name {
            Some(name) => name.clone(),
            None => read_project_name(project_dir)?,
        };
        if project_name.trim().is_empty() {
            return Err(ConfigError::Validation(
                "project name must not be empty".into(),
            ));
        }

        let android_src_dir = opts
            .android_src_directory
            .clone()
            .unwrap_or_else(|| file.android_src_directory.clone());
        validate_dir_name("android_src_directory", &android_src_dir)?;

        let ios_asset_name = opts
            .ios_asset_name
            .clone()
            .unwrap_or_else(|| file.ios_asset_name.clone());
        validate_dir_name("ios_asset_name", &ios_asset_name)?;

        let timeout_secs = opts
            .task_timeout_secs
            .unwrap_or(file.processing.task_timeout_secs);
        if timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "processing.task_timeout_secs must be greater than 0".into(),
            ));
        }

        let mut notices = Vec::new();

        let orientation_input = opts.orientation.as_deref().unwrap_or(&file.orientation);
        let orientation = resolve_orientation(
            orientation_input,
            opts.portrait,
            opts.landscape,
            &mut notices,
        );

        // Relative source and output paths are taken from the project directory.
        let assets = AssetSources {
            icon: check_asset(project_dir, "icon", opts.icon.as_deref(), &mut notices),
            splash: check_asset(project_dir, "splash", opts.splash.as_deref(), &mut notices),
            notification_icon: check_asset(
                project_dir,
                "android-notification-icon",
                opts.notification_icon.as_deref(),
                &mut notices,
            ),
        };

        let output_root = project_dir.join(
            opts.assets_output_path
                .clone()
                .unwrap_or_else(|| PathBuf::from(&file.assets_output_path)),
        );

        Ok(Self {
            project_name,
            project_root: project_dir.to_path_buf(),
            output_root,
            android_src_dir,
            ios_asset_name,
            platforms: PlatformSelection::from_flags(opts.android, opts.ios),
            orientation,
            store: opts.store || file.store,
            assets,
            task_timeout: Duration::from_secs(timeout_secs),
            notices,
        })
    }

    /// Placeholder values for destination templates.
    pub fn destination_context(&self) -> DestinationContext {
        DestinationContext {
            project_root: self.project_root.clone(),
            output_root: self.output_root.clone(),
            project_name: self.project_name.clone(),
            android_src_dir: self.android_src_dir.clone(),
            ios_asset_name: self.ios_asset_name.clone(),
        }
    }
}

/// Read `name` from the project's `package.json`.
pub fn read_project_name(project_dir: &Path) -> Result<String, ConfigError> {
    let path = project_dir.join("package.json");
    let descriptor_error = |reason: String| ConfigError::ProjectDescriptor {
        path: path.clone(),
        reason,
    };

    let content = fs::read_to_string(&path).map_err(|e| descriptor_error(e.to_string()))?;
    let package: serde_json::Value =
        serde_json::from_str(&content).map_err(|e| descriptor_error(e.to_string()))?;
    package
        .get("name")
        .and_then(|name| name.as_str())
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .ok_or_else(|| descriptor_error("no \"name\" field".into()))
}

fn validate_dir_name(key: &str, value: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Validation(format!("{key} must not be empty")));
    }
    if value.contains(['/', '\\']) || value == "." || value == ".." {
        return Err(ConfigError::Validation(format!(
            "{key} must be a single directory name (got {value:?})"
        )));
    }
    Ok(())
}

fn resolve_orientation(
    input: &str,
    portrait: bool,
    landscape: bool,
    notices: &mut Vec<Notice>,
) -> Orientation {
    let base = match input.parse::<Orientation>() {
        Ok(orientation) => orientation,
        Err(_) => {
            let notice = Notice::InvalidOrientation(input.to_string());
            tracing::warn!("{notice}");
            notices.push(notice);
            Orientation::All
        }
    };

    match base.narrow(portrait, landscape) {
        Some(orientation) => orientation,
        None => {
            let notice = Notice::OrientationSwitchesIgnored(base);
            tracing::warn!("{notice}");
            notices.push(notice);
            base
        }
    }
}

fn check_asset(
    project_dir: &Path,
    option: &'static str,
    path: Option<&Path>,
    notices: &mut Vec<Notice>,
) -> Option<PathBuf> {
    let path = project_dir.join(path?);
    if path.is_file() {
        return Some(path);
    }
    let notice = Notice::AssetNotFound { option, path };
    tracing::error!("{notice}");
    notices.push(notice);
    None
}
