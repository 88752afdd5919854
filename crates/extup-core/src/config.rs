use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};

use crate::error::ExtupError;

/// Name of the per-project config file, looked up in the working directory.
pub const PROJECT_CONFIG_FILE: &str = "extup.toml";

/// Terminal colors available to the report palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorName {
    Black,
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
    White,
}

impl fmt::Display for ColorName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ColorName::Black => "black",
            ColorName::Red => "red",
            ColorName::Green => "green",
            ColorName::Yellow => "yellow",
            ColorName::Blue => "blue",
            ColorName::Magenta => "magenta",
            ColorName::Cyan => "cyan",
            ColorName::White => "white",
        };
        f.write_str(s)
    }
}

/// Colors per status. `exception` also colors the banner, headers and progress line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Palette {
    #[serde(default = "default_updated_color")]
    pub updated: ColorName,
    #[serde(default = "default_up_to_date_color")]
    pub up_to_date: ColorName,
    #[serde(default = "default_error_color")]
    pub error: ColorName,
    #[serde(default = "default_exception_color")]
    pub exception: ColorName,
}

fn default_updated_color() -> ColorName {
    ColorName::Green
}

fn default_up_to_date_color() -> ColorName {
    ColorName::Blue
}

fn default_error_color() -> ColorName {
    ColorName::Red
}

fn default_exception_color() -> ColorName {
    ColorName::Yellow
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            updated: default_updated_color(),
            up_to_date: default_up_to_date_color(),
            error: default_error_color(),
            exception: default_exception_color(),
        }
    }
}

/// Top-level extup configuration.
///
/// Loaded once at startup and handed to every component; nothing mutates it afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtupConfig {
    /// Printed before the main project update.
    #[serde(default = "default_banner")]
    pub banner: String,

    /// Directory whose immediate children are the extension repositories.
    #[serde(default = "default_extensions_dir")]
    pub extensions_dir: PathBuf,

    /// Subdirectory marking a version-control root.
    #[serde(default = "default_vcs_marker")]
    pub vcs_marker: String,

    /// git executable to invoke.
    #[serde(default = "default_git_binary")]
    pub git_binary: PathBuf,

    /// Arguments placed before every git subcommand, e.g. `["-c", "protocol.version=2"]`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub git_options: Vec<String>,

    /// Diagnostic log, relative to the working directory.
    #[serde(default = "default_log_file")]
    pub log_file: PathBuf,

    /// Repositories updated concurrently per batch. Defaults to available parallelism.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parallelism: Option<usize>,

    #[serde(default)]
    pub palette: Palette,
}

fn default_banner() -> String {
    "Super-Updater".to_string()
}

fn default_extensions_dir() -> PathBuf {
    PathBuf::from("extensions")
}

fn default_vcs_marker() -> String {
    ".git".to_string()
}

fn default_git_binary() -> PathBuf {
    PathBuf::from("git")
}

fn default_log_file() -> PathBuf {
    PathBuf::from("error_log.txt")
}

impl Default for ExtupConfig {
    fn default() -> Self {
        Self {
            banner: default_banner(),
            extensions_dir: default_extensions_dir(),
            vcs_marker: default_vcs_marker(),
            git_binary: default_git_binary(),
            git_options: Vec::new(),
            log_file: default_log_file(),
            parallelism: None,
            palette: Palette::default(),
        }
    }
}

impl ExtupConfig {
    /// Returns the user-level extup directory (`~/.extup/`).
    pub fn home_dir() -> Result<PathBuf, ExtupError> {
        let base = dirs::home_dir().ok_or_else(|| ExtupError::Config {
            message: "could not determine home directory".into(),
        })?;
        Ok(base.join(".extup"))
    }

    /// Returns the path to the user-level config file.
    pub fn user_config_path() -> Result<PathBuf, ExtupError> {
        Ok(Self::home_dir()?.join("config.toml"))
    }

    /// Load `./extup.toml`, then `~/.extup/config.toml`, else defaults.
    pub fn load() -> Result<Self, ExtupError> {
        let local = Path::new(PROJECT_CONFIG_FILE);
        if local.exists() {
            return Self::load_from(local);
        }
        match Self::user_config_path() {
            Ok(path) if path.exists() => Self::load_from(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Load config from a specific path.
    pub fn load_from(path: &Path) -> Result<Self, ExtupError> {
        let content = std::fs::read_to_string(path)?;
        let config: Self =
            toml::from_str(&content).map_err(|e| ExtupError::Serialization(e.to_string()))?;
        config.validate()?;
        tracing::debug!("loaded config from {}", path.display());
        Ok(config)
    }

    fn validate(&self) -> Result<(), ExtupError> {
        if self.parallelism == Some(0) {
            return Err(ExtupError::Config {
                message: "parallelism must be at least 1".into(),
            });
        }
        if self.vcs_marker.is_empty() {
            return Err(ExtupError::Config {
                message: "vcs_marker must not be empty".into(),
            });
        }
        Ok(())
    }

    /// Configured parallelism, or the host's available parallelism. Never 0.
    pub fn effective_parallelism(&self) -> usize {
        match self.parallelism {
            Some(n) => n.max(1),
            None => std::thread::available_parallelism()
                .map(NonZeroUsize::get)
                .unwrap_or(1),
        }
    }
}
