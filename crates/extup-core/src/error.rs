use std::path::PathBuf;

/// Central error type for extup.
#[derive(Debug, thiserror::Error)]
pub enum ExtupError {
    /// git ran and exited non-zero. `detail` is the captured diagnostic text.
    #[error("git {command} failed ({code}): {detail}")]
    GitFailed {
        command: String,
        code: String,
        detail: String,
    },

    #[error("failed to run git {command}: {source}")]
    GitSpawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("repository path not found: {path}")]
    PathNotFound { path: PathBuf },

    #[error("cannot read extensions directory {path}: {message}")]
    Discovery { path: PathBuf, message: String },

    #[error("config error: {message}")]
    Config { message: String },

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

