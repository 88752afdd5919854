use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use extup_core::error::ExtupError;

/// List immediate subdirectories of `root` that contain a `marker` directory.
///
/// Order is filesystem enumeration order. Fails if `root` itself cannot be read.
pub fn scan_extensions(root: &Path, marker: &str) -> Result<Vec<PathBuf>, ExtupError> {
    if !root.is_dir() {
        return Err(ExtupError::Discovery {
            path: root.to_path_buf(),
            message: "not a directory".into(),
        });
    }

    let mut repos = Vec::new();

    let walker = WalkDir::new(root)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true);

    for entry in walker {
        let entry = match entry {
            Ok(e) => e,
            // Depth 0 is the root itself: nothing meaningful can be reported without it.
            Err(e) if e.depth() == 0 => {
                return Err(ExtupError::Discovery {
                    path: root.to_path_buf(),
                    message: e.to_string(),
                });
            }
            Err(e) => {
                tracing::warn!("skipping unreadable entry in {}: {e}", root.display());
                continue;
            }
        };
        if !entry.file_type().is_dir() {
            continue;
        }
        if entry.path().join(marker).is_dir() {
            repos.push(entry.path().to_path_buf());
        } else {
            tracing::debug!("{} has no {marker}, skipping", entry.path().display());
        }
    }

    Ok(repos)
}
