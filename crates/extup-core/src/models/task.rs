use std::path::{Path, PathBuf};

/// A repository scheduled for update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryTask {
    pub path: PathBuf,
    pub name: String,
}

impl RepositoryTask {
    /// Build a task, deriving the display name from the last path component.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = display_name(&path);
        Self { path, name }
    }
}

/// Basename of `path`, or the whole path when it has none (e.g. `/` or `..`).
pub fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}
