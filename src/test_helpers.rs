//! Shared test utilities for the mobile-assets test suite.
//!
//! Builds a throwaway React Native project on disk: `package.json`, the iOS
//! descriptors the splash task patches, and source images.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let project = FakeProject::new("Acme");
//! let icon = project.add_png("icon.png", 64, 64, [0, 0, 255]);
//! let config = project.config(&RunOptions {
//!     icon: Some(icon),
//!     ..project.options()
//! });
//! ```

use std::path::{Path, PathBuf};
use tempfile::TempDir;

use crate::config::{FileConfig, RunConfig, RunOptions};

/// Two build configurations, as Xcode writes them.
pub const PBXPROJ_FIXTURE: &str = "\
\t\t13B07F941A680F5B00A75B9A /* Debug */ = {
\t\t\tbuildSettings = {
\t\t\t\tASSETCATALOG_COMPILER_APPICON_NAME = AppIcon;
\t\t\t\tCLANG_ENABLE_MODULES = YES;
\t\t\t};
\t\t};
\t\t13B07F951A680F5B00A75B9A /* Release */ = {
\t\t\tbuildSettings = {
\t\t\t\tASSETCATALOG_COMPILER_APPICON_NAME = AppIcon;
\t\t\t\tCLANG_ENABLE_MODULES = YES;
\t\t\t};
\t\t};
";

pub const INFO_PLIST_FIXTURE: &str = "<dict>
\t<key>NSLocationWhenInUseUsageDescription</key>
\t<string></string>
\t<key>UILaunchStoryboardName</key>
\t<string>LaunchScreen</string>
\t<key>UIRequiredDeviceCapabilities</key>
</dict>
";

// =========================================================================
// Fixture setup
// =========================================================================

/// A temporary project directory that doubles as the output root.
pub struct FakeProject {
    pub dir: TempDir,
    pub name: String,
}

impl FakeProject {
    /// Create `package.json` and the iOS descriptors for `name`.
    pub fn new(name: &str) -> Self {
        let project = Self {
            dir: TempDir::new().unwrap(),
            name: name.to_string(),
        };
        project.write(
            "package.json",
            &format!(r#"{{"name": "{name}", "version": "0.0.1"}}"#),
        );
        project.write(
            &format!("ios/{name}.xcodeproj/project.pbxproj"),
            PBXPROJ_FIXTURE,
        );
        project.write(&format!("ios/{name}/Info.plist"), INFO_PLIST_FIXTURE);
        project
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn path(&self, relative: &str) -> PathBuf {
        self.root().join(relative)
    }

    /// Write a text file relative to the project root.
    pub fn write(&self, relative: &str, contents: &str) -> PathBuf {
        let path = self.path(relative);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, contents).unwrap();
        path
    }

    pub fn read(&self, relative: &str) -> String {
        std::fs::read_to_string(self.path(relative)).unwrap()
    }

    /// A solid-color PNG source image.
    pub fn add_png(&self, relative: &str, width: u32, height: u32, rgb: [u8; 3]) -> PathBuf {
        let path = self.path(relative);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        image::RgbImage::from_pixel(width, height, image::Rgb(rgb))
            .save(&path)
            .unwrap();
        path
    }

    /// A placeholder source for runs against the mock backend.
    pub fn touch(&self, relative: &str) -> PathBuf {
        self.write(relative, "not really an image")
    }

    /// Options that read the project name from `package.json` and write
    /// into the project directory.
    pub fn options(&self) -> RunOptions {
        RunOptions {
            assets_output_path: Some(self.root().to_path_buf()),
            ..RunOptions::default()
        }
    }

    pub fn config(&self, opts: &RunOptions) -> RunConfig {
        RunConfig::resolve(self.root(), opts, &FileConfig::default()).unwrap()
    }
}

// =========================================================================
// Lookup helpers
// =========================================================================

/// Paths under `root`, relative and `/`-separated, sorted.
pub fn relative_files(root: &Path) -> Vec<String> {
    let mut files = Vec::new();
    collect_files(root, root, &mut files);
    files.sort();
    files
}

fn collect_files(root: &Path, dir: &Path, files: &mut Vec<String>) {
    for entry in std::fs::read_dir(dir).unwrap() {
        let path = entry.unwrap().path();
        if path.is_dir() {
            collect_files(root, &path, files);
        } else {
            let relative = path.strip_prefix(root).unwrap();
            let parts: Vec<_> = relative
                .components()
                .map(|c| c.as_os_str().to_string_lossy().to_string())
                .collect();
            files.push(parts.join("/"));
        }
    }
}

/// Count `needle` occurrences in a project file.
pub fn count_in(project: &FakeProject, relative: &str, needle: &str) -> usize {
    project.read(relative).matches(needle).count()
}
