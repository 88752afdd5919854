use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use extup_core::config::ExtupConfig;
use extup_core::error::ExtupError;

/// Captured output of a successful git command. Only stderr carries signal for us.
#[derive(Debug)]
pub struct GitOutput {
    pub stderr: String,
}

/// Handle to the external git executable.
#[derive(Debug, Clone)]
pub struct Git {
    binary: PathBuf,
    options: Vec<String>,
}

impl Git {
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
            options: Vec::new(),
        }
    }

    pub fn from_config(config: &ExtupConfig) -> Self {
        Self::new(&config.git_binary).with_options(config.git_options.clone())
    }

    /// Arguments placed before every subcommand.
    pub fn with_options(mut self, options: Vec<String>) -> Self {
        self.options = options;
        self
    }

    /// Run a git command in the given directory.
    fn run(&self, dir: &Path, args: &[&str]) -> Result<GitOutput, ExtupError> {
        tracing::debug!("git {} in {}", args.join(" "), dir.display());
        let output = Command::new(&self.binary)
            .args(&self.options)
            .args(args)
            .current_dir(dir)
            .stdin(Stdio::null())
            .output()
            .map_err(|source| ExtupError::GitSpawn {
                command: args.join(" "),
                source,
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let stdout = String::from_utf8_lossy(&output.stdout);
            let code = output
                .status
                .code()
                .map(|c| format!("exit status {c}"))
                .unwrap_or_else(|| "terminated by signal".to_string());
            let detail = [stderr.trim(), stdout.trim()]
                .into_iter()
                .find(|s| !s.is_empty())
                .map(str::to_string)
                .unwrap_or_else(|| code.clone());
            return Err(ExtupError::GitFailed {
                command: args.join(" "),
                code,
                detail,
            });
        }

        Ok(GitOutput {
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        })
    }

    /// Ask the remote whether it has commits we have not seen, without changing anything.
    ///
    /// git reports would-be ref updates on stderr; any output there means "changes exist".
    pub fn has_remote_changes(&self, dir: &Path) -> Result<bool, ExtupError> {
        let out = self.run(dir, &["fetch", "--dry-run"])?;
        Ok(!out.stderr.trim().is_empty())
    }

    /// Update remote-tracking refs only.
    pub fn fetch(&self, dir: &Path) -> Result<(), ExtupError> {
        self.run(dir, &["fetch"])?;
        Ok(())
    }

    /// Fetch and integrate into the current branch.
    pub fn pull(&self, dir: &Path) -> Result<(), ExtupError> {
        self.run(dir, &["pull"])?;
        Ok(())
    }
}
