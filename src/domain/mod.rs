//! Domain logic - pure rules independent of git, the feed and the toolchain

pub mod commit;
pub mod marker;
pub mod version;

pub use commit::{
    count_ignored_requests, find_update_request, CommitRecord, RequestCandidate,
    VersionUpdateRequest,
};
pub use marker::{MarkerPattern, DEFAULT_MARKER_PREFIX};
pub use version::{Version, VersionError, BASELINE_VERSION};
