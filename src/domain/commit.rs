use regex::Regex;

use crate::domain::version::{Version, VersionError};

const UPDATE_REQUEST_PATTERN: &str = r"\(#update package version to (\d+)\.(\d+)\.(\d+)\)";

/// A commit as read from the history window, most recent first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitRecord {
    /// Full commit hash
    pub hash: String,
    /// Commit summary line
    pub message: String,
}

impl CommitRecord {
    pub fn new(hash: impl Into<String>, message: impl Into<String>) -> Self {
        CommitRecord {
            hash: hash.into(),
            message: message.into(),
        }
    }
}

/// A commit whose message carries `(#update package version to X.Y.Z)`.
///
/// Matching only says a request was intended. The version itself is pulled
/// out by [`RequestCandidate::extract`], which can still fail when a digit
/// run does not fit a version component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestCandidate<'a> {
    pub commit: &'a CommitRecord,
    /// Position of the commit in the window (0 = newest)
    pub position: usize,
    raw_version: String,
}

/// An explicit version request taken from a commit message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionUpdateRequest {
    pub source_commit_hash: String,
    pub requested_version: Version,
}

impl<'a> RequestCandidate<'a> {
    /// Match a single commit against the update request pattern.
    pub fn parse(commit: &'a CommitRecord, position: usize) -> Option<Self> {
        let captures = Regex::new(UPDATE_REQUEST_PATTERN)
            .ok()
            .and_then(|re| re.captures(&commit.message))?;
        let raw_version = format!(
            "{}.{}.{}",
            captures.get(1)?.as_str(),
            captures.get(2)?.as_str(),
            captures.get(3)?.as_str()
        );

        Some(RequestCandidate {
            commit,
            position,
            raw_version,
        })
    }

    /// The version text exactly as written in the message.
    pub fn raw_version(&self) -> &str {
        &self.raw_version
    }

    pub fn extract(&self) -> Result<VersionUpdateRequest, VersionError> {
        let requested_version = Version::parse(&self.raw_version)?;
        Ok(VersionUpdateRequest {
            source_commit_hash: self.commit.hash.clone(),
            requested_version,
        })
    }
}

/// Finds the newest commit in the window that carries an update request.
pub fn find_update_request(commits: &[CommitRecord]) -> Option<RequestCandidate<'_>> {
    commits
        .iter()
        .enumerate()
        .find_map(|(position, commit)| RequestCandidate::parse(commit, position))
}

/// Counts requests older than the newest one. These are never replayed.
pub fn count_ignored_requests(commits: &[CommitRecord], newest: &RequestCandidate<'_>) -> usize {
    commits
        .iter()
        .enumerate()
        .skip(newest.position + 1)
        .filter(|(position, commit)| RequestCandidate::parse(commit, *position).is_some())
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_request_in_message() {
        let commit = CommitRecord::new("abc", "Bump (#update package version to 2.0.0) now");
        let candidate = RequestCandidate::parse(&commit, 0).unwrap();
        assert_eq!(candidate.raw_version(), "2.0.0");

        let request = candidate.extract().unwrap();
        assert_eq!(request.source_commit_hash, "abc");
        assert_eq!(request.requested_version, Version::new(2, 0, 0));
    }

    #[test]
    fn test_parse_requires_exact_phrase() {
        let messages = [
            "update package version to 2.0.0",
            "(#update package version to 2.0)",
            "(#update package version to v2.0.0)",
            "(#update package version to 1.x.0)",
            "(#Update package version to 2.0.0)",
            "(#update package version to 2.0.0",
        ];

        for message in messages {
            let commit = CommitRecord::new("abc", message);
            assert!(
                RequestCandidate::parse(&commit, 0).is_none(),
                "should not match: {}",
                message
            );
        }
    }

    #[test]
    fn test_extract_fails_on_oversized_component() {
        let commit = CommitRecord::new(
            "abc",
            "(#update package version to 1.99999999999999999999999.0)",
        );
        let candidate = RequestCandidate::parse(&commit, 0).unwrap();
        assert!(candidate.extract().is_err());
    }

    #[test]
    fn test_find_returns_newest_match() {
        let commits = vec![
            CommitRecord::new("c3", "fix typo"),
            CommitRecord::new("c2", "(#update package version to 3.0.0)"),
            CommitRecord::new("c1", "(#update package version to 2.0.0)"),
        ];

        let candidate = find_update_request(&commits).unwrap();
        assert_eq!(candidate.commit.hash, "c2");
        assert_eq!(candidate.position, 1);
        assert_eq!(count_ignored_requests(&commits, &candidate), 1);
    }

    #[test]
    fn test_find_none_without_requests() {
        let commits = vec![
            CommitRecord::new("c2", "feat: add thing"),
            CommitRecord::new("c1", "initial commit"),
        ];
        assert!(find_update_request(&commits).is_none());
        assert!(find_update_request(&[]).is_none());
    }
}
