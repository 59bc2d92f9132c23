//! Version resolution
//!
//! Decides the next release version in strict order:
//!
//! 1. Read the lookback window and take the newest commit carrying
//!    `(#update package version to X.Y.Z)`.
//! 2. If its marker already exists the request was consumed by an earlier
//!    run, so fall through. Otherwise extract the version (a malformed one
//!    is fatal), create and publish the marker, and return the version.
//! 3. Ask the feed for the latest published version: none yields `1.0.0`,
//!    otherwise the patch component is incremented.
//!
//! The marker is the only durable side effect and the only guard between
//! invocations. Two runs racing on the same commit can both pass the marker
//! check before either publishes.

use crate::domain::{
    count_ignored_requests, find_update_request, MarkerPattern, Version, BASELINE_VERSION,
};
use crate::error::{AutoversionError, Result};
use crate::feed::Feed;
use crate::git::SourceControl;
use crate::notice::ResolutionNotice;
use std::fmt;
use tracing::{debug, info, warn};

/// Default number of recent commits scanned for a request.
pub const DEFAULT_LOOKBACK: usize = 10;

/// Inputs of a single resolution
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolveOptions {
    pub lookback: usize,
    pub markers: MarkerPattern,
    pub package_id: String,
    /// Resolve without creating or publishing a marker
    pub dry_run: bool,
}

impl ResolveOptions {
    pub fn new(package_id: impl Into<String>) -> Self {
        ResolveOptions {
            lookback: DEFAULT_LOOKBACK,
            markers: MarkerPattern::default(),
            package_id: package_id.into(),
            dry_run: false,
        }
    }
}

/// Where a resolved version came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionSource {
    /// Explicit request in a commit message, now guarded by `marker`
    Explicit { commit: String, marker: String },
    /// Patch increment over the feed's latest version
    FeedIncrement { previous: Version },
    /// Feed had no version; baseline used
    Baseline,
}

impl fmt::Display for VersionSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VersionSource::Explicit { commit, .. } => {
                let short = commit.get(..7).unwrap_or(commit);
                write!(f, "explicit request in commit {}", short)
            }
            VersionSource::FeedIncrement { previous } => {
                write!(f, "patch increment over feed version {}", previous)
            }
            VersionSource::Baseline => write!(f, "baseline (no published version)"),
        }
    }
}

/// Result of a successful resolution
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub version: Version,
    pub source: VersionSource,
    pub notices: Vec<ResolutionNotice>,
}

/// Resolves the next version using a source control gateway and a feed
pub struct VersionResolver<'a, S: ?Sized, F: ?Sized> {
    scm: &'a S,
    feed: &'a F,
}

impl<'a, S, F> VersionResolver<'a, S, F>
where
    S: SourceControl + ?Sized,
    F: Feed + ?Sized,
{
    pub fn new(scm: &'a S, feed: &'a F) -> Self {
        VersionResolver { scm, feed }
    }

    pub async fn resolve(&self, options: &ResolveOptions) -> Result<Resolution> {
        let mut notices = Vec::new();

        if let Some((version, source)) = self.explicit_request(options, &mut notices)? {
            info!(version = %version, "using version requested in commit history");
            return Ok(Resolution {
                version,
                source,
                notices,
            });
        }

        info!(package_id = %options.package_id, "no unprocessed request, consulting feed");

        let (version, source) = match self.feed.latest_version(&options.package_id).await? {
            Some(previous) => {
                let next = previous.next_patch().ok_or_else(|| {
                    AutoversionError::malformed(format!(
                        "latest version {} of {} has no next patch release",
                        previous, options.package_id
                    ))
                })?;
                info!(previous = %previous, next = %next, "incrementing feed version");
                (next, VersionSource::FeedIncrement { previous })
            }
            None => {
                notices.push(ResolutionNotice::NoPublishedVersion {
                    package_id: options.package_id.clone(),
                });
                info!(version = %BASELINE_VERSION, "feed has no version, using baseline");
                (BASELINE_VERSION, VersionSource::Baseline)
            }
        };

        Ok(Resolution {
            version,
            source,
            notices,
        })
    }

    /// Steps 1 and 2: `Ok(None)` means fall through to the feed.
    fn explicit_request(
        &self,
        options: &ResolveOptions,
        notices: &mut Vec<ResolutionNotice>,
    ) -> Result<Option<(Version, VersionSource)>> {
        let commits = self.scm.recent_commits(options.lookback)?;
        debug!(count = commits.len(), "scanning commit window");

        let Some(candidate) = find_update_request(&commits) else {
            debug!("no update request in window");
            return Ok(None);
        };

        let ignored = count_ignored_requests(&commits, &candidate);
        if ignored > 0 {
            warn!(ignored, "older update requests in window are ignored");
            notices.push(ResolutionNotice::OlderRequestsIgnored { count: ignored });
        }

        let commit_hash = candidate.commit.hash.as_str();
        let marker = options.markers.marker_for(commit_hash);

        if self.scm.marker_exists(&marker)? {
            info!(marker = %marker, "update request already processed");
            notices.push(ResolutionNotice::AlreadyProcessed {
                marker,
                requested: candidate.raw_version().to_string(),
            });
            return Ok(None);
        }

        let request = candidate.extract().map_err(|e| {
            AutoversionError::extraction(format!("commit {}: {}", commit_hash, e))
        })?;

        if options.dry_run {
            notices.push(ResolutionNotice::MarkerNotWritten {
                marker: marker.clone(),
            });
        } else {
            self.scm.create_marker(&marker, &request.source_commit_hash)?;
            self.scm.publish_marker(&marker)?;
        }

        Ok(Some((
            request.requested_version,
            VersionSource::Explicit {
                commit: request.source_commit_hash,
                marker,
            },
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::MockFeed;
    use crate::git::MockRepository;

    #[tokio::test]
    async fn test_explicit_request_wins_over_feed() {
        let repo =
            MockRepository::with_commits([("c2", "chore (#update package version to 4.1.0)")]);
        let feed = MockFeed::latest(Version::new(1, 0, 0));

        let resolution = VersionResolver::new(&repo, &feed)
            .resolve(&ResolveOptions::new("Acme"))
            .await
            .unwrap();

        assert_eq!(resolution.version, Version::new(4, 1, 0));
        assert!(feed.queries().is_empty());
    }

    #[tokio::test]
    async fn test_dry_run_writes_no_marker() {
        let repo = MockRepository::with_commits([("c2", "(#update package version to 4.1.0)")]);
        let feed = MockFeed::absent();
        let options = ResolveOptions {
            dry_run: true,
            ..ResolveOptions::new("Acme")
        };

        let resolution = VersionResolver::new(&repo, &feed)
            .resolve(&options)
            .await
            .unwrap();

        assert_eq!(resolution.version, Version::new(4, 1, 0));
        assert!(repo.markers().is_empty());
        assert_eq!(
            resolution.notices,
            vec![ResolutionNotice::MarkerNotWritten {
                marker: "processed-c2".to_string()
            }]
        );
    }

    #[test]
    fn test_source_display() {
        let source = VersionSource::Explicit {
            commit: "0123456789abcdef".to_string(),
            marker: "processed-0123456789abcdef".to_string(),
        };
        assert_eq!(source.to_string(), "explicit request in commit 0123456");
        assert_eq!(
            VersionSource::FeedIncrement {
                previous: Version::new(2, 3, 7)
            }
            .to_string(),
            "patch increment over feed version 2.3.7"
        );
    }
}
