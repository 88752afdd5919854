use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Context;
use extup_core::config::ExtupConfig;
use extup_core::diagnostic_log::DiagnosticLog;
use extup_core::models::outcome::UpdateStatus;
use extup_sync::engine::UpdateEngine;
use extup_sync::git_ops::Git;
use extup_sync::main_project::MainProjectUpdater;
use extup_sync::probe::GitProbe;
use extup_sync::progress::SpinnerProgress;
use extup_sync::report::{Report, ReportPrinter};
use extup_sync::style::Styles;

/// What a full run produced, after everything has been printed.
#[derive(Debug)]
pub struct RunSummary {
    pub main_project: UpdateStatus,
    pub report: Report,
    pub total: usize,
    /// Time spent updating extensions; the main project is not included.
    pub elapsed: Duration,
}

/// Update the project in the working directory and its extensions.
pub async fn run() -> anyhow::Result<()> {
    let config = ExtupConfig::load()?;
    let root = std::env::current_dir().context("cannot determine working directory")?;
    run_in(&root, &config).await?;
    Ok(())
}

/// Update the project at `root`, then every extension under it.
pub async fn run_in(root: &Path, config: &ExtupConfig) -> anyhow::Result<RunSummary> {
    let log = DiagnosticLog::new(root.join(&config.log_file));
    let styles = Styles::new(&config.palette);
    let git = Git::from_config(config);

    // The project itself goes first, on its own; its result is not part of the report.
    let main_project =
        MainProjectUpdater::new(git.clone(), root, styles.clone(), &log).run(&config.banner);

    let extensions = root.join(&config.extensions_dir);
    let tasks = extup_discover::discover(&extensions, &config.vcs_marker)?;
    let total = tasks.len();

    let engine = UpdateEngine::new(
        config.effective_parallelism(),
        Arc::new(GitProbe::new(git)),
    );
    tracing::debug!(
        "updating {total} repositories, {} at a time",
        engine.parallelism()
    );
    let progress = SpinnerProgress::new(&styles);

    let started = Instant::now();
    let outcomes = engine.run(tasks, &progress).await;
    let elapsed = started.elapsed();

    let printer = ReportPrinter::new(styles, &log);
    let report = printer.consume(&outcomes);
    print!("{}", printer.render(&report, total, elapsed));

    Ok(RunSummary {
        main_project,
        report,
        total,
        elapsed,
    })
}
