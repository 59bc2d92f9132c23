use crate::domain::CommitRecord;
use crate::error::{AutoversionError, Result};
use crate::git::SourceControl;
use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;

/// Mock repository for testing without actual git operations
///
/// Commits are stored newest first. Local and published markers are tracked
/// separately so tests can observe a create that was never published.
pub struct MockRepository {
    commits: Vec<CommitRecord>,
    local_markers: RefCell<BTreeMap<String, String>>,
    published_markers: RefCell<Vec<String>>,
    history_error: Option<String>,
    fail_create: Cell<bool>,
    fail_publish: Cell<bool>,
    history_reads: Cell<usize>,
}

impl MockRepository {
    /// Create a new empty mock repository
    pub fn new() -> Self {
        MockRepository {
            commits: Vec::new(),
            local_markers: RefCell::new(BTreeMap::new()),
            published_markers: RefCell::new(Vec::new()),
            history_error: None,
            fail_create: Cell::new(false),
            fail_publish: Cell::new(false),
            history_reads: Cell::new(0),
        }
    }

    /// Build a repository whose history is `commits`, newest first.
    pub fn with_commits<I, H, M>(commits: I) -> Self
    where
        I: IntoIterator<Item = (H, M)>,
        H: Into<String>,
        M: Into<String>,
    {
        let mut repo = Self::new();
        for (hash, message) in commits {
            repo.commits.push(CommitRecord::new(hash, message));
        }
        repo
    }

    /// Add a commit on top of the history (it becomes the newest)
    pub fn push_commit(&mut self, hash: impl Into<String>, message: impl Into<String>) {
        self.commits.insert(0, CommitRecord::new(hash, message));
    }

    /// Pretend a marker already exists, as if created by an earlier run
    pub fn add_marker(&self, name: impl Into<String>, commit_hash: impl Into<String>) {
        self.local_markers
            .borrow_mut()
            .insert(name.into(), commit_hash.into());
    }

    /// Make every history read fail
    pub fn fail_history(&mut self, reason: impl Into<String>) {
        self.history_error = Some(reason.into());
    }

    pub fn fail_create(&self, fail: bool) {
        self.fail_create.set(fail);
    }

    pub fn fail_publish(&self, fail: bool) {
        self.fail_publish.set(fail);
    }

    /// Markers that exist locally, with the commit each points at
    pub fn markers(&self) -> BTreeMap<String, String> {
        self.local_markers.borrow().clone()
    }

    /// Markers pushed to the remote, in push order
    pub fn published(&self) -> Vec<String> {
        self.published_markers.borrow().clone()
    }

    /// How many times the commit window was read
    pub fn history_reads(&self) -> usize {
        self.history_reads.get()
    }
}

impl Default for MockRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl SourceControl for MockRepository {
    fn recent_commits(&self, limit: usize) -> Result<Vec<CommitRecord>> {
        self.history_reads.set(self.history_reads.get() + 1);

        if let Some(reason) = &self.history_error {
            return Err(AutoversionError::history(reason.clone()));
        }

        Ok(self.commits.iter().take(limit).cloned().collect())
    }

    fn marker_exists(&self, name: &str) -> Result<bool> {
        Ok(self.local_markers.borrow().contains_key(name))
    }

    fn create_marker(&self, name: &str, commit_hash: &str) -> Result<()> {
        if self.fail_create.get() {
            return Err(AutoversionError::marker(format!(
                "Cannot create tag '{}': simulated failure",
                name
            )));
        }

        let mut markers = self.local_markers.borrow_mut();
        if markers.contains_key(name) {
            return Err(AutoversionError::marker(format!(
                "Cannot create tag '{}': already exists",
                name
            )));
        }
        markers.insert(name.to_string(), commit_hash.to_string());
        Ok(())
    }

    fn publish_marker(&self, name: &str) -> Result<()> {
        if self.fail_publish.get() {
            return Err(AutoversionError::marker(format!(
                "Cannot push tag '{}': simulated failure",
                name
            )));
        }

        if !self.local_markers.borrow().contains_key(name) {
            return Err(AutoversionError::marker(format!(
                "Cannot push tag '{}': no such local tag",
                name
            )));
        }

        self.published_markers.borrow_mut().push(name.to_string());
        Ok(())
    }
}
