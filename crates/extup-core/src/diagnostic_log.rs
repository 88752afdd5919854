//! Append-only diagnostic log for failed updates.
//!
//! One line per event: `<YYYY-MM-DD HH:MM:SS> <STATUS>: <message>`. The file is
//! opened, appended to and closed for every entry; nothing is kept in memory.

use std::fmt;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::Local;

use crate::error::ExtupError;
use crate::models::outcome::StatusKind;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Status label written into a log entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogStatus {
    Error,
    Exception,
}

impl LogStatus {
    /// Log status for a failure kind; `None` for successful kinds.
    pub fn for_kind(kind: StatusKind) -> Option<Self> {
        match kind {
            StatusKind::Error => Some(LogStatus::Error),
            StatusKind::Exception => Some(LogStatus::Exception),
            StatusKind::Updated | StatusKind::UpToDate => None,
        }
    }
}

impl fmt::Display for LogStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogStatus::Error => f.write_str("ERROR"),
            LogStatus::Exception => f.write_str("EXCEPTION"),
        }
    }
}

/// Process-wide sink for error and exception events.
#[derive(Debug)]
pub struct DiagnosticLog {
    path: PathBuf,
    // Serializes appends so concurrent writers never interleave partial lines.
    write_lock: Mutex<()>,
}

impl DiagnosticLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one entry, creating the file if needed.
    pub fn append(&self, status: LogStatus, message: &str) -> Result<(), ExtupError> {
        let timestamp = Local::now().format(TIMESTAMP_FORMAT).to_string();
        let line = format_entry(&timestamp, status, message);

        let _guard = self
            .write_lock
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        file.write_all(line.as_bytes())?;
        Ok(())
    }

    /// Like [`append`](Self::append), but a failing log never interrupts the run.
    pub fn record(&self, status: LogStatus, message: &str) {
        if let Err(e) = self.append(status, message) {
            tracing::warn!("could not write to {}: {e}", self.path.display());
        }
    }
}

fn format_entry(timestamp: &str, status: LogStatus, message: &str) -> String {
    // Keep one event per line even if git printed several.
    let message = message.replace(['\r', '\n'], " ");
    format!("{timestamp} {status}: {message}\n")
}
