/// Default namespace for processing markers.
pub const DEFAULT_MARKER_PREFIX: &str = "processed-";

/// Naming scheme for processing markers: `<prefix><full-commit-hash>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkerPattern {
    prefix: String,
}

impl MarkerPattern {
    /// Create a pattern; an empty prefix falls back to [`DEFAULT_MARKER_PREFIX`].
    pub fn new(prefix: impl Into<String>) -> Self {
        let prefix = prefix.into();
        if prefix.is_empty() {
            return Self::default();
        }
        MarkerPattern { prefix }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Marker name for a commit hash
    pub fn marker_for(&self, commit_hash: &str) -> String {
        format!("{}{}", self.prefix, commit_hash)
    }
}

impl Default for MarkerPattern {
    fn default() -> Self {
        MarkerPattern {
            prefix: DEFAULT_MARKER_PREFIX.to_string(),
        }
    }
}
