use std::path::{Path, PathBuf};

use extup_core::diagnostic_log::{DiagnosticLog, LogStatus};
use extup_core::error::ExtupError;
use extup_core::models::outcome::UpdateStatus;
use extup_core::models::task::display_name;

use crate::git_ops::Git;
use crate::probe::{classify, fetch_if_changed};
use crate::style::Styles;

/// One-shot update of the project the tool runs in.
///
/// Unlike the extension probe, new commits are pulled into the working tree.
pub struct MainProjectUpdater<'a> {
    git: Git,
    root: PathBuf,
    name: String,
    styles: Styles,
    log: &'a DiagnosticLog,
}

impl<'a> MainProjectUpdater<'a> {
    pub fn new(
        git: Git,
        root: impl Into<PathBuf>,
        styles: Styles,
        log: &'a DiagnosticLog,
    ) -> Self {
        let root = root.into();
        let name = display_name(&root);
        Self {
            git,
            root,
            name,
            styles,
            log,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Check the remote and pull when it has new commits.
    pub fn update(&self) -> UpdateStatus {
        classify(pull_if_changed(&self.git, &self.root))
    }

    /// Print the banner, update, print the result and log failures.
    ///
    /// The returned status is informational; it never feeds the extension report.
    pub fn run(&self, banner: &str) -> UpdateStatus {
        println!("{}", self.styles.header().apply_to(banner));
        let status = self.update();
        println!("{}", self.status_line(&status));

        if let (Some(log_status), Some(detail)) =
            (LogStatus::for_kind(status.kind()), status.detail())
        {
            let what = match log_status {
                LogStatus::Error => "error",
                LogStatus::Exception => "exception",
            };
            self.log
                .record(log_status, &format!("{} update {what}: {detail}", self.name));
        }
        status
    }

    pub fn status_line(&self, status: &UpdateStatus) -> String {
        match status {
            UpdateStatus::Updated => self
                .styles
                .updated
                .apply_to(format!("{} updated successfully.", self.name))
                .to_string(),
            UpdateStatus::UpToDate => self
                .styles
                .up_to_date
                .apply_to(format!("{} is up to date.", self.name))
                .to_string(),
            UpdateStatus::Error(detail) => format!(
                "{} {detail}",
                self.styles.error.apply_to("Error updating main project:")
            ),
            UpdateStatus::Exception(detail) => format!(
                "{} {detail}",
                self.styles
                    .exception
                    .apply_to(format!("Exception updating {}:", self.name))
            ),
        }
    }
}

fn pull_if_changed(git: &Git, root: &Path) -> Result<bool, ExtupError> {
    let changed = fetch_if_changed(git, root)?;
    if changed {
        git.pull(root)?;
    }
    Ok(changed)
}
