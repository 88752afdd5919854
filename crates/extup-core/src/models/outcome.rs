use std::fmt;

/// Classified result of a single update attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateStatus {
    /// The remote had new commits and they were fetched.
    Updated,
    UpToDate,
    /// git exited non-zero; carries its captured diagnostic text.
    Error(String),
    /// Anything else: missing path, launch failure, worker panic.
    Exception(String),
}

/// Discriminant of [`UpdateStatus`], used for bucketing and labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusKind {
    Updated,
    UpToDate,
    Error,
    Exception,
}

impl StatusKind {
    /// Report order.
    pub const ALL: [StatusKind; 4] = [
        StatusKind::Updated,
        StatusKind::UpToDate,
        StatusKind::Error,
        StatusKind::Exception,
    ];

    pub fn label(self) -> &'static str {
        match self {
            StatusKind::Updated => "UPDATED",
            StatusKind::UpToDate => "UP_TO_DATE",
            StatusKind::Error => "ERROR",
            StatusKind::Exception => "EXCEPTION",
        }
    }
}

impl fmt::Display for StatusKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl UpdateStatus {
    pub fn kind(&self) -> StatusKind {
        match self {
            UpdateStatus::Updated => StatusKind::Updated,
            UpdateStatus::UpToDate => StatusKind::UpToDate,
            UpdateStatus::Error(_) => StatusKind::Error,
            UpdateStatus::Exception(_) => StatusKind::Exception,
        }
    }

    pub fn detail(&self) -> Option<&str> {
        match self {
            UpdateStatus::Error(d) | UpdateStatus::Exception(d) => Some(d),
            _ => None,
        }
    }
}

/// An [`UpdateStatus`] tied to the repository that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoOutcome {
    pub name: String,
    pub status: UpdateStatus,
}

impl RepoOutcome {
    pub fn new(name: impl Into<String>, status: UpdateStatus) -> Self {
        Self {
            name: name.into(),
            status,
        }
    }
}
