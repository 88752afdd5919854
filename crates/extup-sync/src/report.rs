use std::fmt::Write as _;
use std::time::Duration;

use extup_core::diagnostic_log::{DiagnosticLog, LogStatus};
use extup_core::models::outcome::{RepoOutcome, StatusKind, UpdateStatus};

use crate::style::Styles;

/// Repository names grouped by outcome, in the order they were consumed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Report {
    pub updated: Vec<String>,
    pub up_to_date: Vec<String>,
    pub errors: Vec<String>,
    pub exceptions: Vec<String>,
}

impl Report {
    /// Bucket every outcome. Pure: the same input always yields the same report.
    pub fn aggregate(outcomes: &[RepoOutcome]) -> Self {
        let mut report = Self::default();
        for outcome in outcomes {
            report.record(outcome);
        }
        report
    }

    pub fn record(&mut self, outcome: &RepoOutcome) {
        let bucket = match outcome.status {
            UpdateStatus::Updated => &mut self.updated,
            UpdateStatus::UpToDate => &mut self.up_to_date,
            UpdateStatus::Error(_) => &mut self.errors,
            UpdateStatus::Exception(_) => &mut self.exceptions,
        };
        bucket.push(outcome.name.clone());
    }

    pub fn bucket(&self, kind: StatusKind) -> &[String] {
        match kind {
            StatusKind::Updated => &self.updated,
            StatusKind::UpToDate => &self.up_to_date,
            StatusKind::Error => &self.errors,
            StatusKind::Exception => &self.exceptions,
        }
    }

    pub fn count(&self, kind: StatusKind) -> usize {
        self.bucket(kind).len()
    }

    /// Number of outcomes recorded across all buckets.
    pub fn total(&self) -> usize {
        StatusKind::ALL.iter().map(|k| self.count(*k)).sum()
    }
}

/// Prints failures as they are consumed and renders the final report.
pub struct ReportPrinter<'a> {
    styles: Styles,
    log: &'a DiagnosticLog,
}

impl<'a> ReportPrinter<'a> {
    pub fn new(styles: Styles, log: &'a DiagnosticLog) -> Self {
        Self { styles, log }
    }

    /// Walk the outcomes once: print and log each failure immediately, then bucket it.
    pub fn consume(&self, outcomes: &[RepoOutcome]) -> Report {
        let mut report = Report::default();
        for outcome in outcomes {
            if let Some(line) = self.failure_line(outcome) {
                println!("{line}");
            }
            self.log_failure(outcome);
            report.record(outcome);
        }
        report
    }

    /// `ERROR <name> - <detail>` / `EXCEPTION <name> - <detail>`; `None` for successes.
    pub fn failure_line(&self, outcome: &RepoOutcome) -> Option<String> {
        let detail = outcome.status.detail()?;
        let kind = outcome.status.kind();
        Some(
            self.styles
                .for_kind(kind)
                .apply_to(format!("{kind} {} - {detail}", outcome.name))
                .to_string(),
        )
    }

    fn log_failure(&self, outcome: &RepoOutcome) {
        if let (Some(status), Some(detail)) = (
            LogStatus::for_kind(outcome.status.kind()),
            outcome.status.detail(),
        ) {
            self.log
                .record(status, &format!("{} - {detail}", outcome.name));
        }
    }

    /// Grouped report, tallies and timing. `total` is the number of repositories discovered.
    pub fn render(&self, report: &Report, total: usize, elapsed: Duration) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "{}", self.styles.header().apply_to("Fetch report:"));
        for kind in StatusKind::ALL {
            let label = self.styles.for_kind(kind).apply_to(kind.label());
            for name in report.bucket(kind) {
                let _ = writeln!(out, "{label} {name}");
            }
        }

        let _ = writeln!(
            out,
            "{} repositories updated successfully.",
            report.count(StatusKind::Updated)
        );
        let _ = writeln!(
            out,
            "{} repositories failed with errors.",
            report.count(StatusKind::Error)
        );
        let _ = writeln!(
            out,
            "{} repositories encountered exceptions.",
            report.count(StatusKind::Exception)
        );
        let _ = writeln!(
            out,
            "{} repositories already up to date.",
            report.count(StatusKind::UpToDate)
        );
        let _ = writeln!(
            out,
            "Updated {total} Git repositories in {:.2} seconds.",
            elapsed.as_secs_f64()
        );
        out
    }
}
