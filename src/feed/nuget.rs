use crate::domain::Version;
use crate::error::{AutoversionError, Result};
use crate::feed::{normalize_feed_address, Feed};
use async_trait::async_trait;
use reqwest::{header, Client, StatusCode};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info};

/// Search response of a NuGet v3 feed (`<feed>/query?q=<id>`)
#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    data: Vec<SearchEntry>,
}

#[derive(Debug, Deserialize)]
struct SearchEntry {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    version: Option<String>,
}

/// NuGet feed client
pub struct NugetFeed {
    client: Client,
    base_url: String,
    token: String,
}

impl NugetFeed {
    /// Create a client for `address` (normalized) authorized with `token`.
    ///
    /// `timeout` of `None` leaves the transport default in place.
    pub fn new(
        address: &str,
        token: impl Into<String>,
        timeout: Option<Duration>,
    ) -> Result<Self> {
        let mut builder = Client::builder().user_agent(concat!(
            env!("CARGO_PKG_NAME"),
            "/",
            env!("CARGO_PKG_VERSION")
        ));
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        let client = builder
            .build()
            .map_err(|e| AutoversionError::config(format!("Cannot build HTTP client: {}", e)))?;

        Ok(NugetFeed {
            client,
            base_url: normalize_feed_address(address),
            token: token.into(),
        })
    }

    /// Normalized feed root
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn query_url(&self) -> String {
        format!("{}/query", self.base_url)
    }
}

/// The entry whose id is the package itself (case-insensitive).
///
/// Search also returns packages with similar names; those never stand in for
/// the package. An entry without an id is taken as the package, since such a
/// feed answers for the queried id only.
fn select_entry<'a>(entries: &'a [SearchEntry], package_id: &str) -> Option<&'a SearchEntry> {
    entries
        .iter()
        .find(|entry| {
            entry
                .id
                .as_deref()
                .is_some_and(|id| id.eq_ignore_ascii_case(package_id))
        })
        .or_else(|| entries.iter().find(|entry| entry.id.is_none()))
}

#[async_trait]
impl Feed for NugetFeed {
    async fn latest_version(&self, package_id: &str) -> Result<Option<Version>> {
        let url = self.query_url();
        debug!(url = %url, package_id, "querying feed");

        let response = self
            .client
            .get(&url)
            .query(&[("q", package_id)])
            .header(header::AUTHORIZATION, format!("token {}", self.token))
            .send()
            .await
            .map_err(|e| AutoversionError::unreachable(format!("{}: {}", url, e)))?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(AutoversionError::auth(format!("{} returned {}", url, status)));
        }
        if !status.is_success() {
            return Err(AutoversionError::unreachable(format!(
                "{} returned {}",
                url, status
            )));
        }

        let body: SearchResponse = response
            .json()
            .await
            .map_err(|e| AutoversionError::malformed(format!("{}: {}", url, e)))?;

        let Some(raw) = select_entry(&body.data, package_id).and_then(|e| e.version.as_deref())
        else {
            info!(package_id, hits = body.data.len(), "feed has no published version");
            return Ok(None);
        };

        let version = Version::parse_published(raw).map_err(|e| {
            AutoversionError::malformed(format!("latest version of {}: {}", package_id, e))
        })?;

        info!(package_id, latest = %version, "feed reports latest version");
        Ok(Some(version))
    }
}
