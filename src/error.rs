use thiserror::Error;

/// Unified error type for nuget-autoversion operations.
///
/// Every variant is terminal for the current invocation. Nothing is retried.
#[derive(Error, Debug)]
pub enum AutoversionError {
    #[error("Commit history unavailable: {0}")]
    HistoryUnavailable(String),

    #[error("Failed to extract version from commit message: {0}")]
    VersionExtractionFailed(String),

    #[error("Marker write failed: {0}")]
    MarkerWriteFailed(String),

    #[error("Feed unreachable: {0}")]
    FeedUnreachable(String),

    #[error("Feed rejected credentials: {0}")]
    FeedAuthRejected(String),

    #[error("Feed response malformed: {0}")]
    FeedResponseMalformed(String),

    #[error("Build failed: {0}")]
    BuildFailed(String),

    #[error("Pack failed: {0}")]
    PackFailed(String),

    #[error("Push failed: {0}")]
    PushFailed(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for Results in nuget-autoversion
pub type Result<T> = std::result::Result<T, AutoversionError>;

impl AutoversionError {
    pub fn history(msg: impl Into<String>) -> Self {
        AutoversionError::HistoryUnavailable(msg.into())
    }

    pub fn extraction(msg: impl Into<String>) -> Self {
        AutoversionError::VersionExtractionFailed(msg.into())
    }

    pub fn marker(msg: impl Into<String>) -> Self {
        AutoversionError::MarkerWriteFailed(msg.into())
    }

    pub fn unreachable(msg: impl Into<String>) -> Self {
        AutoversionError::FeedUnreachable(msg.into())
    }

    pub fn auth(msg: impl Into<String>) -> Self {
        AutoversionError::FeedAuthRejected(msg.into())
    }

    pub fn malformed(msg: impl Into<String>) -> Self {
        AutoversionError::FeedResponseMalformed(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        AutoversionError::Config(msg.into())
    }

    /// Short machine-readable name of the error kind, used in log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            AutoversionError::HistoryUnavailable(_) => "HistoryUnavailable",
            AutoversionError::VersionExtractionFailed(_) => "VersionExtractionFailed",
            AutoversionError::MarkerWriteFailed(_) => "MarkerWriteFailed",
            AutoversionError::FeedUnreachable(_) => "FeedUnreachable",
            AutoversionError::FeedAuthRejected(_) => "FeedAuthRejected",
            AutoversionError::FeedResponseMalformed(_) => "FeedResponseMalformed",
            AutoversionError::BuildFailed(_) => "BuildFailed",
            AutoversionError::PackFailed(_) => "PackFailed",
            AutoversionError::PushFailed(_) => "PushFailed",
            AutoversionError::Config(_) => "Config",
            AutoversionError::Io(_) => "Io",
        }
    }
}
