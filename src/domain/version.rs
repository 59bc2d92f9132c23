use std::fmt;
use thiserror::Error;

/// Baseline version used when the feed has never seen the package.
pub const BASELINE_VERSION: Version = Version {
    major: 1,
    minor: 0,
    patch: 0,
};

/// Reasons a version string could not be turned into a [`Version`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VersionError {
    #[error("invalid version format: '{0}' - expected MAJOR.MINOR.PATCH")]
    Format(String),

    #[error("invalid {component} version: '{value}'")]
    Component {
        component: &'static str,
        value: String,
    },
}

/// Semantic version representation
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Version {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
}

impl Version {
    /// Create a new version
    pub fn new(major: u64, minor: u64, patch: u64) -> Self {
        Version {
            major,
            minor,
            patch,
        }
    }

    /// Parse a strict `X.Y.Z` string where every component is a run of digits.
    pub fn parse(text: &str) -> Result<Self, VersionError> {
        let parts: Vec<&str> = text.split('.').collect();
        if parts.len() != 3 {
            return Err(VersionError::Format(text.to_string()));
        }

        Ok(Version {
            major: parse_component("major", parts[0])?,
            minor: parse_component("minor", parts[1])?,
            patch: parse_component("patch", parts[2])?,
        })
    }

    /// Parse a version as published on a package feed.
    ///
    /// Full SemVer is accepted (pre-release and build metadata are dropped).
    /// Four-part NuGet versions such as `1.2.3.4` keep their first three
    /// components.
    pub fn parse_published(text: &str) -> Result<Self, VersionError> {
        let text = text.trim();
        if let Ok(v) = semver::Version::parse(text) {
            return Ok(Version::new(v.major, v.minor, v.patch));
        }

        let parts: Vec<&str> = text.split('.').collect();
        if parts.len() < 3 {
            return Err(VersionError::Format(text.to_string()));
        }

        Ok(Version {
            major: parse_component("major", parts[0])?,
            minor: parse_component("minor", parts[1])?,
            patch: parse_component("patch", parts[2])?,
        })
    }

    /// Next patch release: major and minor are preserved.
    ///
    /// `None` when the patch component is already `u64::MAX`.
    pub fn next_patch(&self) -> Option<Self> {
        Some(Version {
            major: self.major,
            minor: self.minor,
            patch: self.patch.checked_add(1)?,
        })
    }
}

fn parse_component(component: &'static str, value: &str) -> Result<u64, VersionError> {
    if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
        return Err(VersionError::Component {
            component,
            value: value.to_string(),
        });
    }

    value.parse::<u64>().map_err(|_| VersionError::Component {
        component,
        value: value.to_string(),
    })
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}
