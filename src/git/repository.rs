use crate::domain::CommitRecord;
use crate::error::{AutoversionError, Result};
use git2::{CredentialType, ErrorCode, Oid, Repository as Git2Repo, Sort};
use std::path::Path;
use tracing::{debug, info, warn};

/// Credential callback attempts before giving up on a remote.
const MAX_CREDENTIAL_ATTEMPTS: usize = 3;

/// Wrapper around git2::Repository with our trait interface
pub struct Git2Repository {
    repo: Git2Repo,
    remote: String,
    token: Option<String>,
}

impl Git2Repository {
    /// Discover the repository containing `working_dir`.
    ///
    /// Markers are published to `remote`. When a `token` is given it is
    /// offered for HTTPS authentication as `x-access-token`.
    pub fn open<P: AsRef<Path>>(
        working_dir: P,
        remote: impl Into<String>,
        token: Option<String>,
    ) -> Result<Self> {
        let working_dir = working_dir.as_ref();
        let repo = Git2Repo::discover(working_dir).map_err(|e| {
            AutoversionError::history(format!(
                "Not a git repository: {}: {}",
                working_dir.display(),
                e.message()
            ))
        })?;

        debug!(path = %working_dir.display(), "opened git repository");

        Ok(Git2Repository {
            repo,
            remote: remote.into(),
            token,
        })
    }

    fn remote_callbacks(&self) -> git2::RemoteCallbacks<'_> {
        let token = self.token.as_deref();
        let mut attempts = 0;

        let mut callbacks = git2::RemoteCallbacks::new();
        callbacks.credentials(move |_url, username_from_url, allowed_types| {
            attempts += 1;
            if attempts > MAX_CREDENTIAL_ATTEMPTS {
                return Err(git2::Error::from_str("credentials rejected by remote"));
            }

            if allowed_types.contains(CredentialType::USER_PASS_PLAINTEXT) {
                if let Some(token) = token {
                    return git2::Cred::userpass_plaintext("x-access-token", token);
                }
            }

            if allowed_types.contains(CredentialType::SSH_KEY) {
                let username = username_from_url.unwrap_or("git");
                if let Ok(cred) = git2::Cred::ssh_key_from_agent(username) {
                    return Ok(cred);
                }

                if let Some(home) = dirs::home_dir() {
                    for key in ["id_ed25519", "id_rsa", "id_ecdsa"] {
                        let path = home.join(".ssh").join(key);
                        if path.exists() {
                            if let Ok(cred) = git2::Cred::ssh_key(username, None, &path, None) {
                                return Ok(cred);
                            }
                        }
                    }
                }
            }

            git2::Cred::default()
        });

        callbacks.push_update_reference(|refname, status| match status {
            Some(status) => {
                warn!(refname, status, "remote rejected reference update");
                Err(git2::Error::from_str(&format!(
                    "remote rejected {}: {}",
                    refname, status
                )))
            }
            None => Ok(()),
        });

        callbacks
    }
}

impl super::SourceControl for Git2Repository {
    fn recent_commits(&self, limit: usize) -> Result<Vec<CommitRecord>> {
        if limit == 0 {
            return Ok(Vec::new());
        }

        let mut revwalk = self
            .repo
            .revwalk()
            .map_err(|e| AutoversionError::history(format!("Cannot walk history: {}", e)))?;
        revwalk
            .set_sorting(Sort::TOPOLOGICAL | Sort::TIME)
            .map_err(|e| AutoversionError::history(format!("Cannot sort history: {}", e)))?;
        revwalk
            .push_head()
            .map_err(|e| AutoversionError::history(format!("Cannot read HEAD: {}", e)))?;

        let mut commits = Vec::new();

        for oid_result in revwalk.take(limit) {
            let oid = oid_result
                .map_err(|e| AutoversionError::history(format!("Cannot walk history: {}", e)))?;

            let commit = self.repo.find_commit(oid).map_err(|e| {
                AutoversionError::history(format!("Cannot read commit {}: {}", oid, e))
            })?;

            commits.push(CommitRecord {
                hash: oid.to_string(),
                message: commit.summary().unwrap_or_default().to_string(),
            });
        }

        debug!(count = commits.len(), limit, "read commit window");
        Ok(commits)
    }

    fn marker_exists(&self, name: &str) -> Result<bool> {
        let reference_name = format!("refs/tags/{}", name);

        match self.repo.find_reference(&reference_name) {
            Ok(_) => Ok(true),
            Err(e) if e.code() == ErrorCode::NotFound => Ok(false),
            Err(e) => Err(AutoversionError::history(format!(
                "Cannot look up marker '{}': {}",
                name, e
            ))),
        }
    }

    fn create_marker(&self, name: &str, commit_hash: &str) -> Result<()> {
        let oid = Oid::from_str(commit_hash).map_err(|e| {
            AutoversionError::marker(format!("Invalid commit hash '{}': {}", commit_hash, e))
        })?;

        let object = self.repo.find_object(oid, None).map_err(|e| {
            AutoversionError::marker(format!("Cannot find commit {}: {}", commit_hash, e))
        })?;

        self.repo.tag_lightweight(name, &object, false).map_err(|e| {
            AutoversionError::marker(format!("Cannot create tag '{}': {}", name, e))
        })?;

        info!(marker = name, commit = commit_hash, "created marker tag");
        Ok(())
    }

    fn publish_marker(&self, name: &str) -> Result<()> {
        let mut remote = self.repo.find_remote(&self.remote).map_err(|e| {
            AutoversionError::marker(format!(
                "Cannot publish tag '{}': no remote named '{}': {}",
                name, self.remote, e
            ))
        })?;

        let mut push_options = git2::PushOptions::new();
        push_options.remote_callbacks(self.remote_callbacks());

        let refspec = format!("refs/tags/{}:refs/tags/{}", name, name);

        remote
            .push(&[refspec.as_str()], Some(&mut push_options))
            .map_err(|e| {
                let reason = match e.class() {
                    git2::ErrorClass::Net => format!("network error: {}", e.message()),
                    git2::ErrorClass::Reference => format!("reference error: {}", e.message()),
                    _ => e.message().to_string(),
                };
                AutoversionError::marker(format!(
                    "Cannot push tag '{}' to '{}': {}",
                    name, self.remote, reason
                ))
            })?;

        info!(marker = name, remote = %self.remote, "published marker tag");
        Ok(())
    }
}
