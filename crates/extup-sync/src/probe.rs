use std::path::Path;

use extup_core::error::ExtupError;
use extup_core::models::outcome::UpdateStatus;
use extup_core::models::task::RepositoryTask;

use crate::git_ops::Git;

/// Checks one repository and brings its remote-tracking refs up to date.
///
/// Implementations must not print or log; the caller reports outcomes. They
/// are called from many workers at once.
pub trait RepoProbe: Send + Sync {
    fn probe(&self, task: &RepositoryTask) -> UpdateStatus;
}

/// Probe backed by the git executable: dry-run fetch, then fetch when the remote moved.
#[derive(Debug, Clone)]
pub struct GitProbe {
    git: Git,
}

impl GitProbe {
    pub fn new(git: Git) -> Self {
        Self { git }
    }
}

impl RepoProbe for GitProbe {
    fn probe(&self, task: &RepositoryTask) -> UpdateStatus {
        classify(fetch_if_changed(&self.git, &task.path))
    }
}

/// Returns whether the remote had new commits (and they were fetched).
///
/// A path that exists but is not a directory is left to git, which cannot run there.
pub(crate) fn fetch_if_changed(git: &Git, path: &Path) -> Result<bool, ExtupError> {
    if !path.exists() {
        return Err(ExtupError::PathNotFound {
            path: path.to_path_buf(),
        });
    }
    if !git.has_remote_changes(path)? {
        return Ok(false);
    }
    git.fetch(path)?;
    Ok(true)
}

/// Map a check/fetch result onto the outcome taxonomy.
///
/// Only a git process that ran and exited non-zero is an `Error`; everything else
/// that went wrong is an `Exception`.
pub fn classify(result: Result<bool, ExtupError>) -> UpdateStatus {
    match result {
        Ok(true) => UpdateStatus::Updated,
        Ok(false) => UpdateStatus::UpToDate,
        Err(ExtupError::GitFailed { detail, .. }) => UpdateStatus::Error(detail),
        Err(e) => UpdateStatus::Exception(e.to_string()),
    }
}
