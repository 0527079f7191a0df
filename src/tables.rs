//! Platform size tables: every artifact a run can produce.
//!
//! Each `(Platform, AssetKind)` pair owns one ordered slice of [`SpecRow`]s.
//! A row names the slot, its exact pixel size, how the source is fitted
//! into it and where the file lands. Destinations are templates relative to
//! the output root, with three placeholders filled from
//! [`DestinationContext`]:
//!
//! | Placeholder | Source |
//! |---|---|
//! | `{project}` | project name (`--project-name` or `package.json`) |
//! | `{src_dir}` | Android source set (`--android-src-directory`, default `main`) |
//! | `{icon_set}` | iOS app icon set name (`--ios-asset-name`, default `AppIcon`) |
//!
//! ## Output layout
//!
//! ```text
//! <output root>/
//! ├── ios/
//! │   ├── <project>.xcodeproj/project.pbxproj          # patched
//! │   ├── <project>/Info.plist                          # patched
//! │   ├── <project>/Images.xcassets/
//! │   │   ├── AppIcon.appiconset/Icon-*.png + Contents.json
//! │   │   └── LaunchImage.launchimage/Default-*.png + Contents.json
//! │   └── store/app_store_icon.png
//! └── android/
//!     ├── app/src/main/res/
//!     │   ├── mipmap-*/ic_launcher.png, ic_launcher_round.png
//!     │   ├── drawable-*/ic_notification.png, launch_screen.png
//!     │   ├── drawable-land-*/launch_screen.png
//!     │   ├── drawable/launch_screen_bitmap.xml
//!     │   └── values/colors.xml, styles.xml
//!     └── store/play_store_icon.png, feature_graphic.png
//! ```

use crate::types::{AssetKind, Orientation, Platform};
use std::path::{Path, PathBuf};

/// How a source image is fitted into a row's target size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fit {
    /// Scale straight to the target, ignoring the source aspect ratio.
    Stretch,
    /// Center-crop to the target aspect ratio, then scale.
    CenterCrop,
}

/// Asset-catalog metadata for an iOS row (`Contents.json` entry).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogSlot {
    pub idiom: &'static str,
    pub subtype: Option<&'static str>,
    pub minimum_system_version: Option<&'static str>,
}

/// One required output artifact.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpecRow {
    pub slot_name: &'static str,
    pub width: u32,
    pub height: u32,
    pub destination: &'static str,
    pub scale_factor: Option<f32>,
    /// Splash rows only; `None` rows pass every orientation filter.
    pub orientation: Option<Orientation>,
    pub fit: Fit,
    /// Which source image feeds this row.
    pub source: AssetKind,
    pub catalog: Option<CatalogSlot>,
}

impl SpecRow {
    /// File name component of the destination.
    pub fn file_name(&self) -> &'static str {
        self.destination
            .rsplit('/')
            .next()
            .unwrap_or(self.destination)
    }

    /// Size in points (`width / scale`), as written in `Contents.json`.
    pub fn points(&self) -> String {
        let scale = self.scale_factor.unwrap_or(1.0);
        format_points(self.width as f32 / scale, self.height as f32 / scale)
    }
}

fn format_points(w: f32, h: f32) -> String {
    let fmt = |v: f32| {
        if v.fract() == 0.0 {
            format!("{}", v as u32)
        } else {
            format!("{v}")
        }
    };
    format!("{}x{}", fmt(w), fmt(h))
}

// =============================================================================
// Well-known locations
// =============================================================================

pub const APP_ICON_SET_DIR: &str = "ios/{project}/Images.xcassets/{icon_set}.appiconset";
pub const LAUNCH_IMAGE_DIR: &str = "ios/{project}/Images.xcassets/LaunchImage.launchimage";
pub const PBXPROJ_PATH: &str = "ios/{project}.xcodeproj/project.pbxproj";
pub const INFO_PLIST_PATH: &str = "ios/{project}/Info.plist";

macro_rules! appiconset {
    ($file:literal) => {
        concat!("ios/{project}/Images.xcassets/{icon_set}.appiconset/", $file)
    };
}

macro_rules! launchimage {
    ($file:literal) => {
        concat!("ios/{project}/Images.xcassets/LaunchImage.launchimage/", $file)
    };
}

macro_rules! android_res {
    ($file:literal) => {
        concat!("android/app/src/{src_dir}/res/", $file)
    };
}

// =============================================================================
// Row constructors
// =============================================================================

const fn square(
    slot_name: &'static str,
    size: u32,
    destination: &'static str,
    source: AssetKind,
) -> SpecRow {
    SpecRow {
        slot_name,
        width: size,
        height: size,
        destination,
        scale_factor: None,
        orientation: None,
        fit: Fit::Stretch,
        source,
        catalog: None,
    }
}

const fn ios_icon(
    slot_name: &'static str,
    idiom: &'static str,
    points: u32,
    scale: u32,
    destination: &'static str,
) -> SpecRow {
    SpecRow {
        slot_name,
        width: points * scale,
        height: points * scale,
        destination,
        scale_factor: Some(scale as f32),
        orientation: None,
        fit: Fit::Stretch,
        source: AssetKind::Icon,
        catalog: Some(CatalogSlot {
            idiom,
            subtype: None,
            minimum_system_version: None,
        }),
    }
}

#[allow(clippy::too_many_arguments)]
const fn launch_image(
    slot_name: &'static str,
    idiom: &'static str,
    subtype: Option<&'static str>,
    minimum_system_version: &'static str,
    orientation: Orientation,
    width: u32,
    height: u32,
    scale: u32,
    destination: &'static str,
) -> SpecRow {
    SpecRow {
        slot_name,
        width,
        height,
        destination,
        scale_factor: Some(scale as f32),
        orientation: Some(orientation),
        fit: Fit::CenterCrop,
        source: AssetKind::Splash,
        catalog: Some(CatalogSlot {
            idiom,
            subtype,
            minimum_system_version: Some(minimum_system_version),
        }),
    }
}

const fn android_splash(
    slot_name: &'static str,
    orientation: Orientation,
    width: u32,
    height: u32,
    destination: &'static str,
) -> SpecRow {
    SpecRow {
        slot_name,
        width,
        height,
        destination,
        scale_factor: None,
        orientation: Some(orientation),
        fit: Fit::CenterCrop,
        source: AssetKind::Splash,
        catalog: None,
    }
}

// =============================================================================
// Tables
// =============================================================================

pub static IOS_ICONS: &[SpecRow] = &[
    ios_icon("iphone-20@2x", "iphone", 20, 2, appiconset!("Icon-20@2x.png")),
    ios_icon("iphone-20@3x", "iphone", 20, 3, appiconset!("Icon-20@3x.png")),
    ios_icon("iphone-29@2x", "iphone", 29, 2, appiconset!("Icon-29@2x.png")),
    ios_icon("iphone-29@3x", "iphone", 29, 3, appiconset!("Icon-29@3x.png")),
    ios_icon("iphone-40@2x", "iphone", 40, 2, appiconset!("Icon-40@2x.png")),
    ios_icon("iphone-40@3x", "iphone", 40, 3, appiconset!("Icon-40@3x.png")),
    ios_icon("iphone-60@2x", "iphone", 60, 2, appiconset!("Icon-60@2x.png")),
    ios_icon("iphone-60@3x", "iphone", 60, 3, appiconset!("Icon-60@3x.png")),
    ios_icon("marketing-1024", "ios-marketing", 1024, 1, appiconset!("Icon-1024.png")),
];

pub static ANDROID_ICONS: &[SpecRow] = &[
    square("mdpi", 48, android_res!("mipmap-mdpi/ic_launcher.png"), AssetKind::Icon),
    square("hdpi", 72, android_res!("mipmap-hdpi/ic_launcher.png"), AssetKind::Icon),
    square("xhdpi", 96, android_res!("mipmap-xhdpi/ic_launcher.png"), AssetKind::Icon),
    square("xxhdpi", 144, android_res!("mipmap-xxhdpi/ic_launcher.png"), AssetKind::Icon),
    square("xxxhdpi", 192, android_res!("mipmap-xxxhdpi/ic_launcher.png"), AssetKind::Icon),
    square("mdpi-round", 48, android_res!("mipmap-mdpi/ic_launcher_round.png"), AssetKind::Icon),
    square("hdpi-round", 72, android_res!("mipmap-hdpi/ic_launcher_round.png"), AssetKind::Icon),
    square("xhdpi-round", 96, android_res!("mipmap-xhdpi/ic_launcher_round.png"), AssetKind::Icon),
    square("xxhdpi-round", 144, android_res!("mipmap-xxhdpi/ic_launcher_round.png"), AssetKind::Icon),
    square("xxxhdpi-round", 192, android_res!("mipmap-xxxhdpi/ic_launcher_round.png"), AssetKind::Icon),
];

pub static ANDROID_NOTIFICATION_ICONS: &[SpecRow] = &[
    square("mdpi", 24, android_res!("drawable-mdpi/ic_notification.png"), AssetKind::NotificationIcon),
    square("hdpi", 36, android_res!("drawable-hdpi/ic_notification.png"), AssetKind::NotificationIcon),
    square("xhdpi", 48, android_res!("drawable-xhdpi/ic_notification.png"), AssetKind::NotificationIcon),
    square("xxhdpi", 72, android_res!("drawable-xxhdpi/ic_notification.png"), AssetKind::NotificationIcon),
    square("xxxhdpi", 96, android_res!("drawable-xxxhdpi/ic_notification.png"), AssetKind::NotificationIcon),
];

pub static IOS_LAUNCH_IMAGES: &[SpecRow] = &[
    launch_image("iphone-x-portrait", "iphone", Some("2436h"), "11.0", Orientation::Portrait, 1125, 2436, 3, launchimage!("Default-2436h@3x.png")),
    launch_image("iphone-x-landscape", "iphone", Some("2436h"), "11.0", Orientation::Landscape, 2436, 1125, 3, launchimage!("Default-Landscape-2436h@3x.png")),
    launch_image("iphone-plus-portrait", "iphone", Some("736h"), "8.0", Orientation::Portrait, 1242, 2208, 3, launchimage!("Default-736h@3x.png")),
    launch_image("iphone-plus-landscape", "iphone", Some("736h"), "8.0", Orientation::Landscape, 2208, 1242, 3, launchimage!("Default-Landscape-736h@3x.png")),
    launch_image("iphone-6-portrait", "iphone", Some("667h"), "8.0", Orientation::Portrait, 750, 1334, 2, launchimage!("Default-667h@2x.png")),
    launch_image("iphone-4-portrait", "iphone", None, "7.0", Orientation::Portrait, 640, 960, 2, launchimage!("Default@2x.png")),
    launch_image("iphone-5-portrait", "iphone", Some("retina4"), "7.0", Orientation::Portrait, 640, 1136, 2, launchimage!("Default-568h@2x.png")),
    launch_image("ipad-portrait", "ipad", None, "7.0", Orientation::Portrait, 768, 1024, 1, launchimage!("Default-Portrait~ipad.png")),
    launch_image("ipad-landscape", "ipad", None, "7.0", Orientation::Landscape, 1024, 768, 1, launchimage!("Default-Landscape~ipad.png")),
    launch_image("ipad-retina-portrait", "ipad", None, "7.0", Orientation::Portrait, 1536, 2048, 2, launchimage!("Default-Portrait@2x~ipad.png")),
    launch_image("ipad-retina-landscape", "ipad", None, "7.0", Orientation::Landscape, 2048, 1536, 2, launchimage!("Default-Landscape@2x~ipad.png")),
];

pub static ANDROID_SPLASH: &[SpecRow] = &[
    android_splash("mdpi", Orientation::Portrait, 320, 480, android_res!("drawable-mdpi/launch_screen.png")),
    android_splash("hdpi", Orientation::Portrait, 480, 800, android_res!("drawable-hdpi/launch_screen.png")),
    android_splash("xhdpi", Orientation::Portrait, 720, 1280, android_res!("drawable-xhdpi/launch_screen.png")),
    android_splash("xxhdpi", Orientation::Portrait, 960, 1600, android_res!("drawable-xxhdpi/launch_screen.png")),
    android_splash("xxxhdpi", Orientation::Portrait, 1280, 1920, android_res!("drawable-xxxhdpi/launch_screen.png")),
    android_splash("land-mdpi", Orientation::Landscape, 480, 320, android_res!("drawable-land-mdpi/launch_screen.png")),
    android_splash("land-hdpi", Orientation::Landscape, 800, 480, android_res!("drawable-land-hdpi/launch_screen.png")),
    android_splash("land-xhdpi", Orientation::Landscape, 1280, 720, android_res!("drawable-land-xhdpi/launch_screen.png")),
    android_splash("land-xxhdpi", Orientation::Landscape, 1600, 960, android_res!("drawable-land-xxhdpi/launch_screen.png")),
    android_splash("land-xxxhdpi", Orientation::Landscape, 1920, 1280, android_res!("drawable-land-xxxhdpi/launch_screen.png")),
];

pub static ANDROID_STORE: &[SpecRow] = &[
    square("play-store-icon", 512, "android/store/play_store_icon.png", AssetKind::Icon),
    SpecRow {
        slot_name: "feature-graphic",
        width: 1024,
        height: 500,
        destination: "android/store/feature_graphic.png",
        scale_factor: None,
        orientation: None,
        fit: Fit::CenterCrop,
        source: AssetKind::Splash,
        catalog: None,
    },
];

pub static IOS_STORE: &[SpecRow] = &[square(
    "app-store-icon",
    1024,
    "ios/store/app_store_icon.png",
    AssetKind::Icon,
)];

/// The rows for one `(platform, kind)` pair. Pairs a platform does not
/// support (iOS notification icons) are empty.
pub fn rows(platform: Platform, kind: AssetKind) -> &'static [SpecRow] {
    match (platform, kind) {
        (Platform::Ios, AssetKind::Icon) => IOS_ICONS,
        (Platform::Ios, AssetKind::Splash) => IOS_LAUNCH_IMAGES,
        (Platform::Ios, AssetKind::NotificationIcon) => &[],
        (Platform::Ios, AssetKind::StoreListing) => IOS_STORE,
        (Platform::Android, AssetKind::Icon) => ANDROID_ICONS,
        (Platform::Android, AssetKind::Splash) => ANDROID_SPLASH,
        (Platform::Android, AssetKind::NotificationIcon) => ANDROID_NOTIFICATION_ICONS,
        (Platform::Android, AssetKind::StoreListing) => ANDROID_STORE,
    }
}

/// Rows that survive the orientation filter, in table order.
pub fn filter_orientation(
    rows: &'static [SpecRow],
    orientation: Orientation,
) -> impl Iterator<Item = &'static SpecRow> {
    rows.iter().filter(move |row| {
        row.orientation
            .is_none_or(|row_orientation| orientation.admits(row_orientation))
    })
}

// =============================================================================
// Destination templates
// =============================================================================

/// Values substituted into destination templates.
///
/// Generated files go under `output_root`. The Xcode descriptors that get
/// patched belong to the project itself and are found under `project_root`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DestinationContext {
    pub project_root: PathBuf,
    pub output_root: PathBuf,
    pub project_name: String,
    pub android_src_dir: String,
    pub ios_asset_name: String,
}

impl DestinationContext {
    /// Substitute the placeholders of a destination template.
    pub fn expand(&self, template: &str) -> String {
        template
            .replace("{project}", &self.project_name)
            .replace("{src_dir}", &self.android_src_dir)
            .replace("{icon_set}", &self.ios_asset_name)
    }

    /// Absolute-or-root-relative path of a destination template.
    pub fn path(&self, template: &str) -> PathBuf {
        join_relative(&self.output_root, &self.expand(template))
    }

    /// Path of a project file template, such as [`PBXPROJ_PATH`].
    pub fn project_path(&self, template: &str) -> PathBuf {
        join_relative(&self.project_root, &self.expand(template))
    }
}

fn join_relative(root: &Path, relative: &str) -> PathBuf {
    relative
        .split('/')
        .filter(|part| !part.is_empty())
        .fold(root.to_path_buf(), |acc, part| acc.join(part))
}
