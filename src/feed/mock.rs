use crate::domain::Version;
use crate::error::{AutoversionError, Result};
use crate::feed::Feed;
use async_trait::async_trait;
use std::sync::Mutex;

#[derive(Debug, Clone)]
enum Answer {
    Latest(Version),
    Absent,
    Unreachable(String),
    AuthRejected(String),
}

/// Mock feed with a fixed answer, recording every queried package id
pub struct MockFeed {
    answer: Answer,
    queries: Mutex<Vec<String>>,
}

impl MockFeed {
    fn with_answer(answer: Answer) -> Self {
        MockFeed {
            answer,
            queries: Mutex::new(Vec::new()),
        }
    }

    /// Feed whose latest published version is `version`
    pub fn latest(version: Version) -> Self {
        Self::with_answer(Answer::Latest(version))
    }

    /// Feed that has never published the package
    pub fn absent() -> Self {
        Self::with_answer(Answer::Absent)
    }

    pub fn unreachable(reason: impl Into<String>) -> Self {
        Self::with_answer(Answer::Unreachable(reason.into()))
    }

    pub fn auth_rejected(reason: impl Into<String>) -> Self {
        Self::with_answer(Answer::AuthRejected(reason.into()))
    }

    /// Package ids queried so far
    pub fn queries(&self) -> Vec<String> {
        self.queries
            .lock()
            .map(|queries| queries.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl Feed for MockFeed {
    async fn latest_version(&self, package_id: &str) -> Result<Option<Version>> {
        if let Ok(mut queries) = self.queries.lock() {
            queries.push(package_id.to_string());
        }

        match &self.answer {
            Answer::Latest(version) => Ok(Some(*version)),
            Answer::Absent => Ok(None),
            Answer::Unreachable(reason) => Err(AutoversionError::unreachable(reason.clone())),
            Answer::AuthRejected(reason) => Err(AutoversionError::auth(reason.clone())),
        }
    }
}
