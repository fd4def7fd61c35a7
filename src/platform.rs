//! Supported native platforms and their built-in schemas.
use std::fmt;
use std::str::FromStr;

use crate::error::PlatformError;
use crate::patch::{PatchSchema, builtin};

/// Native target with a built-in patch schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, clap::ValueEnum)]
pub enum Platform {
    /// Xcode project (`Info.plist`, `project.pbxproj`).
    Ios,
    /// Gradle project (`build.gradle`, resource XML).
    Android,
}

impl Platform {
    /// Every supported platform.
    #[must_use]
    pub const fn all() -> [Self; 2] {
        [Self::Ios, Self::Android]
    }

    /// Lowercase identifier used in file names and defaults.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Ios => "ios",
            Self::Android => "android",
        }
    }

    /// The built-in schema for this platform.
    #[must_use]
    pub fn schema(self) -> PatchSchema {
        match self {
            Self::Ios => builtin::ios(),
            Self::Android => builtin::android(),
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Platform {
    type Err = PlatformError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .into_iter()
            .find(|p| p.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| PlatformError::Unsupported(s.to_string()))
    }
}
