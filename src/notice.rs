use std::fmt;

/// Non-fatal observations made while resolving a version.
/// These are reported to the user but never change the outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolutionNotice {
    /// The newest request's marker exists; the request was consumed earlier
    AlreadyProcessed { marker: String, requested: String },
    /// Older requests in the window are not replayed
    OlderRequestsIgnored { count: usize },
    /// The feed has never published the package
    NoPublishedVersion { package_id: String },
    /// Dry run: the marker that would have been created and published
    MarkerNotWritten { marker: String },
}

impl fmt::Display for ResolutionNotice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolutionNotice::AlreadyProcessed { marker, requested } => write!(
                f,
                "Request for {} was already processed (marker '{}' exists)",
                requested, marker
            ),
            ResolutionNotice::OlderRequestsIgnored { count } => {
                let noun = if *count == 1 { "request" } else { "requests" };
                write!(
                    f,
                    "{} older version {} in the lookback window ignored",
                    count, noun
                )
            }
            ResolutionNotice::NoPublishedVersion { package_id } => write!(
                f,
                "No published version of '{}' found on the feed",
                package_id
            ),
            ResolutionNotice::MarkerNotWritten { marker } => {
                write!(f, "Dry run: marker '{}' was not created", marker)
            }
        }
    }
}
