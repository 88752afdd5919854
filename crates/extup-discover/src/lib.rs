pub mod scanner;

use std::path::Path;

use extup_core::error::ExtupError;
use extup_core::models::task::RepositoryTask;

use crate::scanner::scan_extensions;

/// Discover repositories directly under `root` that contain `marker`.
pub fn discover(root: &Path, marker: &str) -> Result<Vec<RepositoryTask>, ExtupError> {
    let tasks: Vec<RepositoryTask> = scan_extensions(root, marker)?
        .into_iter()
        .map(RepositoryTask::new)
        .collect();
    tracing::debug!("discovered {} repositories in {}", tasks.len(), root.display());
    Ok(tasks)
}
