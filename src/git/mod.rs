//! Source control gateway
//!
//! This module provides a trait-based abstraction over the git operations the
//! version resolver needs: reading the recent commit window and checking,
//! creating and publishing processing markers (tags).
//!
//! # Overview
//!
//! - [repository::Git2Repository]: real implementation using the `git2` crate
//! - [mock::MockRepository]: in-memory implementation for tests
//!
//! Every implementation is bound to one working root when it is built. No
//! operation depends on the process's current directory.

pub mod mock;
pub mod repository;

pub use mock::MockRepository;
pub use repository::Git2Repository;

use crate::domain::CommitRecord;
use crate::error::Result;

/// Git operations used by the version resolver
///
/// ## Error Handling
///
/// - [SourceControl::recent_commits] fails with
///   [crate::error::AutoversionError::HistoryUnavailable].
/// - [SourceControl::marker_exists] reports absence as `Ok(false)`, never as
///   an error.
/// - [SourceControl::create_marker] and [SourceControl::publish_marker] fail
///   with [crate::error::AutoversionError::MarkerWriteFailed]. A publish
///   failure after a successful local create leaves the local tag in place.
///
/// Implementations need not be `Sync`; a `git2` repository handle is not.
pub trait SourceControl {
    /// Up to `limit` commits reachable from HEAD, most recent first.
    fn recent_commits(&self, limit: usize) -> Result<Vec<CommitRecord>>;

    /// Whether a marker tag with this exact name exists.
    fn marker_exists(&self, name: &str) -> Result<bool>;

    /// Create a local marker tag pointing at `commit_hash`.
    fn create_marker(&self, name: &str, commit_hash: &str) -> Result<()>;

    /// Push an existing local marker tag to the remote.
    fn publish_marker(&self, name: &str) -> Result<()>;
}
