use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use extup_core::config::ExtupConfig;
use extup_core::diagnostic_log::DiagnosticLog;
use extup_cli::update::run_in;
use extup_core::error::ExtupError;
use extup_core::models::outcome::{StatusKind, UpdateStatus};
use extup_core::models::task::RepositoryTask;
use extup_sync::engine::UpdateEngine;
use extup_sync::git_ops::Git;
use extup_sync::probe::GitProbe;
use extup_sync::progress::{BatchProgress, NoProgress};
use extup_sync::report::{Report, ReportPrinter};
use extup_sync::style::Styles;

const FAKE_GIT: &str = r#"echo "$*" >> calls.log
if [ -f .slow ] && [ "$*" = "fetch --dry-run" ]; then
  sleep 1
fi
state=$(cat .fake-remote 2>/dev/null)
case "$state" in
  changes)
    if [ "$*" = "fetch --dry-run" ]; then
      echo "From https://example.com/ext" >&2
      echo "   1a2b3c4..5d6e7f8  main       -> origin/main" >&2
    fi
    ;;
  broken)
    echo "fatal: unable to access 'https://example.com/ext.git/': Could not resolve host" >&2
    exit 128
    ;;
esac
exit 0
"#;

/// A project directory with an `extensions/` folder and a fake git script.
struct Workspace {
    dir: tempfile::TempDir,
    script: PathBuf,
    git: Git,
}

impl Workspace {
    fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("extensions")).unwrap();
        let script = dir.path().join("fake-git.sh");
        std::fs::write(&script, FAKE_GIT).unwrap();
        let git = Git::new("sh").with_options(vec![script.to_string_lossy().to_string()]);
        Self { dir, script, git }
    }

    /// Config pointing git at the fake script.
    fn config(&self) -> ExtupConfig {
        ExtupConfig {
            git_binary: PathBuf::from("sh"),
            git_options: vec![self.script.to_string_lossy().to_string()],
            parallelism: Some(2),
            ..ExtupConfig::default()
        }
    }

    fn root(&self) -> &Path {
        self.dir.path()
    }

    fn extensions(&self) -> PathBuf {
        self.root().join("extensions")
    }

    /// Add an extension repo whose fake remote is `state` ("", "changes" or "broken").
    fn add_extension(&self, name: &str, state: &str) -> PathBuf {
        let path = self.extensions().join(name);
        std::fs::create_dir_all(path.join(".git")).unwrap();
        std::fs::write(path.join(".fake-remote"), state).unwrap();
        path
    }

    fn log(&self) -> DiagnosticLog {
        DiagnosticLog::new(self.root().join("error_log.txt"))
    }

    fn engine(&self, parallelism: usize) -> UpdateEngine {
        UpdateEngine::new(parallelism, Arc::new(GitProbe::new(self.git.clone())))
    }

    fn discover(&self) -> Vec<RepositoryTask> {
        extup_discover::discover(&self.extensions(), ".git").unwrap()
    }
}

fn calls(repo: &Path) -> Vec<String> {
    std::fs::read_to_string(repo.join("calls.log"))
        .unwrap_or_default()
        .lines()
        .map(str::to_string)
        .collect()
}

#[derive(Default)]
struct BatchRecorder {
    sizes: Mutex<Vec<usize>>,
}

impl BatchProgress for BatchRecorder {
    fn batch_started(&self, first: usize, last: usize, _total: usize) {
        self.sizes.lock().unwrap().push(last - first + 1);
    }

    fn batch_finished(&self) {}
}

#[test]
fn test_config_defaults() {
    let config = ExtupConfig::default();
    assert_eq!(config.extensions_dir, PathBuf::from("extensions"));
    assert_eq!(config.vcs_marker, ".git");
    assert_eq!(config.log_file, PathBuf::from("error_log.txt"));
    assert_eq!(config.git_binary, PathBuf::from("git"));
    assert!(config.effective_parallelism() >= 1);
}

#[test]
fn test_config_roundtrip() {
    let mut config = ExtupConfig::default();
    config.parallelism = Some(6);
    let serialized = toml::to_string_pretty(&config).unwrap();
    let deserialized: ExtupConfig = toml::from_str(&serialized).unwrap();
    assert_eq!(deserialized.parallelism, Some(6));
    assert_eq!(deserialized.banner, config.banner);
}

#[test]
fn test_missing_extensions_dir_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let err = extup_discover::discover(&dir.path().join("extensions"), ".git").unwrap_err();
    assert!(matches!(err, ExtupError::Discovery { .. }));
}

#[test]
fn test_discovery_lists_each_repo_once() {
    let ws = Workspace::new();
    ws.add_extension("a1111-sd-webui-tagcomplete", "");
    ws.add_extension("sd-webui-controlnet", "");
    std::fs::create_dir_all(ws.extensions().join("not-a-repo")).unwrap();

    let names: Vec<String> = ws.discover().into_iter().map(|t| t.name).collect();
    let unique: HashSet<&String> = names.iter().collect();
    assert_eq!(names.len(), 2);
    assert_eq!(unique.len(), 2);
    assert!(names.contains(&"sd-webui-controlnet".to_string()));
    assert!(names.contains(&"a1111-sd-webui-tagcomplete".to_string()));
}

#[tokio::test]
async fn test_no_repositories() {
    let ws = Workspace::new();
    let log = ws.log();
    let tasks = ws.discover();
    assert!(tasks.is_empty());

    let outcomes = ws.engine(4).run(tasks, &NoProgress).await;
    assert!(outcomes.is_empty());

    let printer = ReportPrinter::new(Styles::default(), &log);
    let report = printer.consume(&outcomes);
    let plain = console::strip_ansi_codes(&printer.render(&report, 0, Duration::ZERO)).to_string();
    assert!(plain.contains("0 repositories updated successfully."));
    assert!(plain.contains("0 repositories already up to date."));
    assert!(plain.ends_with("Updated 0 Git repositories in 0.00 seconds.\n"));
}

#[cfg(unix)]
mod with_fake_git {
    use super::*;

    #[tokio::test]
    async fn test_five_up_to_date_in_three_batches() {
        let ws = Workspace::new();
        for i in 0..5 {
            ws.add_extension(&format!("ext{i}"), "");
        }
        let recorder = BatchRecorder::default();

        let outcomes = ws.engine(2).run(ws.discover(), &recorder).await;

        assert_eq!(*recorder.sizes.lock().unwrap(), vec![2, 2, 1]);
        let report = Report::aggregate(&outcomes);
        assert_eq!(report.count(StatusKind::UpToDate), 5);
        assert_eq!(report.count(StatusKind::Updated), 0);
        assert_eq!(report.count(StatusKind::Error), 0);
        assert_eq!(report.count(StatusKind::Exception), 0);
    }

    #[tokio::test]
    async fn test_remote_changes_are_fetched_not_logged() {
        let ws = Workspace::new();
        let repo = ws.add_extension("sd-webui-controlnet", "changes");
        let log = ws.log();

        let outcomes = ws.engine(2).run(ws.discover(), &NoProgress).await;
        let report = ReportPrinter::new(Styles::default(), &log).consume(&outcomes);

        assert_eq!(report.updated, ["sd-webui-controlnet"]);
        assert_eq!(calls(&repo), ["fetch --dry-run", "fetch"]);
        assert!(!log.path().exists());
    }

    #[tokio::test]
    async fn test_vanished_repo_is_logged_as_exception() {
        let ws = Workspace::new();
        let repo = ws.add_extension("stale-extension", "");
        let tasks = ws.discover();
        std::fs::remove_dir_all(&repo).unwrap();
        let log = ws.log();

        let outcomes = ws.engine(2).run(tasks, &NoProgress).await;
        assert_eq!(outcomes.len(), 1);
        assert!(matches!(outcomes[0].status, UpdateStatus::Exception(_)));

        let report = ReportPrinter::new(Styles::default(), &log).consume(&outcomes);
        assert_eq!(report.exceptions, ["stale-extension"]);

        let content = std::fs::read_to_string(log.path()).unwrap();
        let lines: Vec<_> = content.lines().collect();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].contains(" EXCEPTION: stale-extension - repository path not found"));
    }

    #[tokio::test]
    async fn test_git_failure_detail_is_reported_verbatim() {
        let ws = Workspace::new();
        ws.add_extension("offline-extension", "broken");
        let log = ws.log();
        let detail = "fatal: unable to access 'https://example.com/ext.git/': Could not resolve host";

        let outcomes = ws.engine(2).run(ws.discover(), &NoProgress).await;
        assert_eq!(outcomes[0].status, UpdateStatus::Error(detail.to_string()));

        let printer = ReportPrinter::new(Styles::default(), &log);
        let line = printer.failure_line(&outcomes[0]).unwrap();
        assert_eq!(
            console::strip_ansi_codes(&line),
            format!("ERROR offline-extension - {detail}")
        );

        printer.consume(&outcomes);
        let content = std::fs::read_to_string(log.path()).unwrap();
        assert!(content.contains(&format!(" ERROR: offline-extension - {detail}")));
    }

    #[tokio::test]
    async fn test_mixed_fleet_full_report() {
        let ws = Workspace::new();
        ws.add_extension("fresh", "changes");
        ws.add_extension("same-1", "");
        ws.add_extension("same-2", "");
        ws.add_extension("offline", "broken");
        let log = ws.log();

        let outcomes = ws.engine(3).run(ws.discover(), &NoProgress).await;
        let printer = ReportPrinter::new(Styles::default(), &log);
        let report = printer.consume(&outcomes);

        assert_eq!(report.total(), 4);
        assert_eq!(report.updated, ["fresh"]);
        assert_eq!(report.errors, ["offline"]);
        assert_eq!(report.count(StatusKind::UpToDate), 2);

        let rendered = printer.render(&report, 4, Duration::from_millis(1500));
        let plain = console::strip_ansi_codes(&rendered).to_string();
        assert!(plain.starts_with("Fetch report:\nUPDATED fresh\n"));
        assert!(plain.contains("1 repositories updated successfully.\n"));
        assert!(plain.contains("1 repositories failed with errors.\n"));
        assert!(plain.contains("0 repositories encountered exceptions.\n"));
        assert!(plain.contains("2 repositories already up to date.\n"));
        assert!(plain.ends_with("Updated 4 Git repositories in 1.50 seconds.\n"));

        let content = std::fs::read_to_string(log.path()).unwrap();
        assert_eq!(content.lines().count(), 1);
    }

    #[tokio::test]
    async fn test_full_run_pulls_project_then_fetches_extensions() {
        let ws = Workspace::new();
        std::fs::write(ws.root().join(".fake-remote"), "changes").unwrap();
        let fresh = ws.add_extension("fresh", "changes");
        ws.add_extension("same", "");
        ws.add_extension("offline", "broken");

        let summary = run_in(ws.root(), &ws.config()).await.unwrap();

        assert_eq!(summary.main_project, UpdateStatus::Updated);
        assert_eq!(calls(ws.root()), ["fetch --dry-run", "fetch", "pull"]);
        assert_eq!(calls(&fresh), ["fetch --dry-run", "fetch"]);
        assert_eq!(summary.total, 3);
        assert_eq!(summary.report.updated, ["fresh"]);
        assert_eq!(summary.report.up_to_date, ["same"]);
        assert_eq!(summary.report.errors, ["offline"]);

        let content = std::fs::read_to_string(ws.root().join("error_log.txt")).unwrap();
        assert_eq!(content.lines().count(), 1);
        assert!(content.contains(" ERROR: offline - fatal: unable to access"));
    }

    #[tokio::test]
    async fn test_missing_extensions_dir_fails_after_project_update() {
        let ws = Workspace::new();
        std::fs::remove_dir_all(ws.extensions()).unwrap();

        let err = run_in(ws.root(), &ws.config()).await.unwrap_err();

        assert!(matches!(
            err.downcast_ref::<ExtupError>(),
            Some(ExtupError::Discovery { .. })
        ));
        assert_eq!(calls(ws.root()), ["fetch --dry-run"]);
    }

    #[tokio::test]
    async fn test_elapsed_covers_extensions_only() {
        let ws = Workspace::new();
        std::fs::write(ws.root().join(".slow"), "").unwrap();
        ws.add_extension("quick", "");

        let started = std::time::Instant::now();
        let summary = run_in(ws.root(), &ws.config()).await.unwrap();

        assert!(started.elapsed() >= Duration::from_secs(1));
        assert!(
            summary.elapsed < Duration::from_secs(1),
            "elapsed {:?} includes the project update",
            summary.elapsed
        );
        assert_eq!(summary.report.up_to_date, ["quick"]);
    }
}
