//! Text outputs: rendered templates, asset-catalog manifests and descriptor patches.
//!
//! Images go through the [`imaging`](crate::imaging) backend; everything
//! textual a run writes goes through here.
//!
//! ## Templates
//!
//! Android resource XML lives in `templates/android/` and is compiled into the
//! binary with `include_str!`, so there is no template directory to ship.
//! Placeholders are `{{name}}`; rendering fails on a placeholder without a
//! value instead of writing it through literally.
//!
//! ## Asset catalogs
//!
//! `Contents.json` for the iOS icon set and launch image set is generated from
//! the same [`SpecRow`]s that produced the images, so the manifest can never
//! list a file that was not written (or miss one that was).
//!
//! ## Descriptor patches
//!
//! Two existing iOS files are edited in place with a regex replacement:
//!
//! | File | Edit |
//! |---|---|
//! | `project.pbxproj` | add `ASSETCATALOG_COMPILER_LAUNCHIMAGE_NAME = LaunchImage;` after each app icon setting |
//! | `Info.plist` | drop the `UILaunchStoryboardName` → `LaunchScreen` entry |
//!
//! Each patch detects a previous application and then leaves the file
//! untouched, so running the generator twice does not duplicate lines.

use crate::tables::{CatalogSlot, SpecRow};
use crate::types::Orientation;
use regex::{Captures, Regex};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("IO error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Template {template} has no value for {{{{{name}}}}}")]
    MissingVariable {
        template: &'static str,
        name: String,
    },
}

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> RenderError + '_ {
    move |source| RenderError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// Write `contents` to `path`, creating parent directories.
pub fn write_file(path: &Path, contents: &str) -> Result<(), RenderError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(io_error(parent))?;
    }
    std::fs::write(path, contents).map_err(io_error(path))
}

// =============================================================================
// Templates
// =============================================================================

/// Text templates embedded in the binary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Template {
    /// `res/values/colors.xml` - needs `splash_background_color`.
    AndroidColors,
    /// `res/drawable/launch_screen_bitmap.xml` - background color + centered splash.
    AndroidLaunchScreenBitmap,
    /// `res/values/styles.xml` - app theme using the launch screen as window background.
    AndroidStyles,
}

impl Template {
    pub fn name(self) -> &'static str {
        match self {
            Template::AndroidColors => "android/colors.xml",
            Template::AndroidLaunchScreenBitmap => "android/launch_screen_bitmap.xml",
            Template::AndroidStyles => "android/styles.xml",
        }
    }

    pub fn source(self) -> &'static str {
        match self {
            Template::AndroidColors => include_str!("../templates/android/colors.xml"),
            Template::AndroidLaunchScreenBitmap => {
                include_str!("../templates/android/launch_screen_bitmap.xml")
            }
            Template::AndroidStyles => include_str!("../templates/android/styles.xml"),
        }
    }

    /// Destination template, relative to the output root.
    pub fn destination(self) -> &'static str {
        match self {
            Template::AndroidColors => "android/app/src/{src_dir}/res/values/colors.xml",
            Template::AndroidLaunchScreenBitmap => {
                "android/app/src/{src_dir}/res/drawable/launch_screen_bitmap.xml"
            }
            Template::AndroidStyles => "android/app/src/{src_dir}/res/values/styles.xml",
        }
    }
}

static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{\s*([A-Za-z_][A-Za-z0-9_]*)\s*\}\}").expect("valid regex"));

/// Substitute `{{name}}` placeholders. Every placeholder must have a value.
pub fn render(template: Template, vars: &[(&str, &str)]) -> Result<String, RenderError> {
    let source = template.source();
    let mut out = String::with_capacity(source.len());
    let mut last = 0;

    for caps in PLACEHOLDER.captures_iter(source) {
        let whole = caps.get(0).expect("group 0 always matches");
        let name = &caps[1];
        let value = vars
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| *value)
            .ok_or_else(|| RenderError::MissingVariable {
                template: template.name(),
                name: name.to_string(),
            })?;
        out.push_str(&source[last..whole.start()]);
        out.push_str(value);
        last = whole.end();
    }
    out.push_str(&source[last..]);
    Ok(out)
}

/// Render a template and write it to `destination`.
pub fn render_template(
    template: Template,
    destination: &Path,
    vars: &[(&str, &str)],
) -> Result<(), RenderError> {
    let contents = render(template, vars)?;
    write_file(destination, &contents)
}

// =============================================================================
// Asset catalog manifests
// =============================================================================

/// Which asset-catalog folder a `Contents.json` describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogKind {
    AppIcon,
    LaunchImage,
}

#[derive(Debug, Serialize)]
struct CatalogContents {
    images: Vec<CatalogImage>,
    info: CatalogInfo,
}

#[derive(Debug, Serialize)]
struct CatalogInfo {
    version: u32,
    author: &'static str,
}

#[derive(Debug, Serialize)]
struct CatalogImage {
    #[serde(skip_serializing_if = "Option::is_none")]
    extent: Option<&'static str>,
    idiom: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    subtype: Option<&'static str>,
    filename: &'static str,
    #[serde(
        rename = "minimum-system-version",
        skip_serializing_if = "Option::is_none"
    )]
    minimum_system_version: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    orientation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    size: Option<String>,
    scale: String,
}

fn catalog_image(kind: CatalogKind, row: &SpecRow, slot: CatalogSlot) -> CatalogImage {
    let scale = format!("{}x", row.scale_factor.unwrap_or(1.0));
    match kind {
        CatalogKind::AppIcon => CatalogImage {
            extent: None,
            idiom: slot.idiom,
            subtype: None,
            filename: row.file_name(),
            minimum_system_version: None,
            orientation: None,
            size: Some(row.points()),
            scale,
        },
        CatalogKind::LaunchImage => CatalogImage {
            extent: Some("full-screen"),
            idiom: slot.idiom,
            subtype: slot.subtype,
            filename: row.file_name(),
            minimum_system_version: slot.minimum_system_version,
            orientation: Some(row.orientation.unwrap_or(Orientation::Portrait).to_string()),
            size: None,
            scale,
        },
    }
}

/// Build the `Contents.json` text for a set of catalog rows.
pub fn catalog_contents<'a>(
    kind: CatalogKind,
    rows: impl IntoIterator<Item = &'a SpecRow>,
) -> Result<String, RenderError> {
    let images = rows
        .into_iter()
        .filter_map(|row| row.catalog.map(|slot| catalog_image(kind, row, slot)))
        .collect();
    let contents = CatalogContents {
        images,
        info: CatalogInfo {
            version: 1,
            author: "xcode",
        },
    };
    let mut json = serde_json::to_string_pretty(&contents)?;
    json.push('\n');
    Ok(json)
}

/// Write `<dir>/Contents.json` for the given rows. Returns the written path.
pub fn write_catalog_contents<'a>(
    dir: &Path,
    kind: CatalogKind,
    rows: impl IntoIterator<Item = &'a SpecRow>,
) -> Result<PathBuf, RenderError> {
    let path = dir.join("Contents.json");
    write_file(&path, &catalog_contents(kind, rows)?)?;
    Ok(path)
}

// =============================================================================
// Descriptor patches
// =============================================================================

/// How a patch recognises that it has already run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatchKind {
    /// Adds text after each anchor. An anchor whose match includes the
    /// optional `applied` group already carries the addition and is skipped.
    Insert,
    /// Removes text; a file without a match is already patched.
    Remove,
}

/// One global regex replacement over a text file.
#[derive(Debug)]
pub struct TextPatch {
    pub description: &'static str,
    pub pattern: &'static Regex,
    pub replacement: &'static str,
    pub kind: PatchKind,
}

/// What [`patch_file`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatchOutcome {
    /// Number of replacements made.
    Applied(usize),
    AlreadyApplied,
    /// The anchor the patch inserts after does not exist.
    PatternNotFound,
}

/// Apply `patch` to the text in `contents`.
pub fn apply_patch(contents: &str, patch: &TextPatch) -> (String, PatchOutcome) {
    let mut anchors = 0;
    let mut pending = 0;
    for caps in patch.pattern.captures_iter(contents) {
        anchors += 1;
        if is_pending(patch.kind, &caps) {
            pending += 1;
        }
    }

    if pending == 0 {
        let outcome = match patch.kind {
            PatchKind::Insert if anchors == 0 => PatchOutcome::PatternNotFound,
            _ => PatchOutcome::AlreadyApplied,
        };
        return (contents.to_string(), outcome);
    }

    let patched = patch
        .pattern
        .replace_all(contents, |caps: &Captures<'_>| {
            let mut out = String::new();
            if is_pending(patch.kind, caps) {
                caps.expand(patch.replacement, &mut out);
            } else {
                out.push_str(&caps[0]);
            }
            out
        })
        .into_owned();
    (patched, PatchOutcome::Applied(pending))
}

fn is_pending(kind: PatchKind, caps: &Captures<'_>) -> bool {
    kind == PatchKind::Remove || caps.name("applied").is_none()
}

/// Patch a file in place. The file is only rewritten when something changed.
pub fn patch_file(path: &Path, patch: &TextPatch) -> Result<PatchOutcome, RenderError> {
    let contents = std::fs::read_to_string(path).map_err(io_error(path))?;
    let (patched, outcome) = apply_patch(&contents, patch);
    if let PatchOutcome::Applied(_) = outcome {
        std::fs::write(path, patched).map_err(io_error(path))?;
    }
    Ok(outcome)
}

// An app icon build setting, plus the LaunchImage setting when it already
// follows on the next line.
static APPICON_SETTING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?m)^([ \t]*)ASSETCATALOG_COMPILER_APPICON_NAME = [^;\n]+;(?P<applied>\r?\n[ \t]*ASSETCATALOG_COMPILER_LAUNCHIMAGE_NAME = [^;\n]+;)?",
    )
    .expect("valid regex")
});

static LAUNCH_STORYBOARD_ENTRY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?m)^[ \t]*<key>UILaunchStoryboardName</key>\s*<string>LaunchScreen</string>[ \t]*\r?\n?",
    )
    .expect("valid regex")
});

/// Register the `LaunchImage` set next to every app icon build setting.
pub fn launch_image_setting_patch() -> TextPatch {
    TextPatch {
        description: "register LaunchImage asset catalog",
        pattern: &APPICON_SETTING,
        replacement: "${0}\n${1}ASSETCATALOG_COMPILER_LAUNCHIMAGE_NAME = LaunchImage;",
        kind: PatchKind::Insert,
    }
}

/// Remove the storyboard launch screen so the launch images are used.
pub fn launch_storyboard_removal_patch() -> TextPatch {
    TextPatch {
        description: "remove LaunchScreen storyboard",
        pattern: &LAUNCH_STORYBOARD_ENTRY,
        replacement: "",
        kind: PatchKind::Remove,
    }
}
