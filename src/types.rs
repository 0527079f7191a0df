//! Shared types used across the pipeline.
//!
//! These are the small value types every stage agrees on: which platform an
//! artifact targets, what kind of source it comes from, and which splash
//! orientations a run covers. All of them are `Copy` and are built once from
//! the validated [`RunConfig`](crate::config::RunConfig).

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Target mobile platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Platform {
    Android,
    Ios,
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Platform::Android => write!(f, "Android"),
            Platform::Ios => write!(f, "iOS"),
        }
    }
}

/// Which source image an artifact is derived from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssetKind {
    Icon,
    Splash,
    NotificationIcon,
    StoreListing,
}

/// Splash-screen orientation filter.
///
/// Splash rows carry the orientation they are designed for; a run keeps
/// the rows that [`Orientation::admits`] accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Orientation {
    Portrait,
    Landscape,
    #[default]
    All,
}

impl Orientation {
    /// Whether a row designed for `row` survives this filter.
    pub fn admits(self, row: Orientation) -> bool {
        match (self, row) {
            (Orientation::All, _) | (_, Orientation::All) => true,
            (filter, row) => filter == row,
        }
    }

    /// Narrow this orientation by the individual `portrait` / `landscape`
    /// switches. Returns `None` when nothing would be left.
    pub fn narrow(self, portrait: bool, landscape: bool) -> Option<Orientation> {
        match (self, portrait, landscape) {
            (Orientation::All, true, true) => Some(Orientation::All),
            (Orientation::All, true, false) | (Orientation::Portrait, true, _) => {
                Some(Orientation::Portrait)
            }
            (Orientation::All, false, true) | (Orientation::Landscape, _, true) => {
                Some(Orientation::Landscape)
            }
            _ => None,
        }
    }
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Orientation::Portrait => write!(f, "portrait"),
            Orientation::Landscape => write!(f, "landscape"),
            Orientation::All => write!(f, "all"),
        }
    }
}

/// Returned when a string is not one of `portrait`, `landscape` or `all`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("orientation should be one of portrait, landscape or all (got {0:?})")]
pub struct InvalidOrientation(pub String);

impl FromStr for Orientation {
    type Err = InvalidOrientation;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "portrait" => Ok(Orientation::Portrait),
            "landscape" => Ok(Orientation::Landscape),
            "all" => Ok(Orientation::All),
            other => Err(InvalidOrientation(other.to_string())),
        }
    }
}

/// Which platforms a run builds for. Never both false.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlatformSelection {
    pub android: bool,
    pub ios: bool,
}

impl PlatformSelection {
    /// Normalize the two CLI switches.
    ///
    /// - neither set → both platforms
    /// - exactly one set → only that one
    /// - both set → both
    pub fn from_flags(android: bool, ios: bool) -> Self {
        Self {
            android: android || !ios,
            ios: ios || !android,
        }
    }

    pub fn includes(self, platform: Platform) -> bool {
        match platform {
            Platform::Android => self.android,
            Platform::Ios => self.ios,
        }
    }
}

impl Default for PlatformSelection {
    fn default() -> Self {
        Self::from_flags(false, false)
    }
}

/// One source image bound to the platform/kind it is being rendered for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetRequest {
    pub source: PathBuf,
    pub kind: AssetKind,
    pub platform: Platform,
    pub store: bool,
    pub orientation: Orientation,
}
