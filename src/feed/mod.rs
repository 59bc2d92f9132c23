//! Feed gateway
//!
//! Queries a NuGet-style package feed for the latest published version of a
//! package. The query is the only network call made during resolution and
//! is therefore the only async operation in the crate.
//!
//! - [nuget::NugetFeed]: HTTP implementation on `reqwest`
//! - [mock::MockFeed]: canned answers for tests

pub mod mock;
pub mod nuget;

pub use mock::MockFeed;
pub use nuget::NugetFeed;

use crate::domain::Version;
use crate::error::Result;
use async_trait::async_trait;

/// Latest-version lookup on a package feed
///
/// `Ok(None)` means the feed has never published the package, which is a
/// normal outcome. Transport failures are
/// [crate::error::AutoversionError::FeedUnreachable]; rejected credentials
/// are [crate::error::AutoversionError::FeedAuthRejected].
#[async_trait]
pub trait Feed: Send + Sync {
    async fn latest_version(&self, package_id: &str) -> Result<Option<Version>>;
}

/// Strip a trailing `/index.json` and then one trailing `/`.
///
/// Accepts both the service index URL and the bare feed root.
///
/// # Example
/// ```
/// use nuget_autoversion::feed::normalize_feed_address;
/// assert_eq!(
///     normalize_feed_address("https://feed.example/v3/index.json"),
///     "https://feed.example/v3"
/// );
/// ```
pub fn normalize_feed_address(address: &str) -> String {
    let address = address.trim();
    let address = address.strip_suffix("/index.json").unwrap_or(address);
    address.strip_suffix('/').unwrap_or(address).to_string()
}
