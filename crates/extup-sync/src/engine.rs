use std::sync::Arc;

use extup_core::models::outcome::{RepoOutcome, UpdateStatus};
use extup_core::models::task::RepositoryTask;

use crate::probe::RepoProbe;
use crate::progress::BatchProgress;

/// Runs a probe over many repositories in fixed-size batches.
///
/// A batch of up to `parallelism` repositories is dispatched at once and joined
/// completely before the next batch starts, so at most `parallelism` probes are
/// ever in flight.
pub struct UpdateEngine {
    parallelism: usize,
    probe: Arc<dyn RepoProbe>,
}

impl UpdateEngine {
    pub fn new(parallelism: usize, probe: Arc<dyn RepoProbe>) -> Self {
        Self {
            parallelism: parallelism.max(1),
            probe,
        }
    }

    pub fn parallelism(&self) -> usize {
        self.parallelism
    }

    /// Probe every task, returning exactly one outcome per task in dispatch order.
    pub async fn run(
        &self,
        tasks: Vec<RepositoryTask>,
        progress: &dyn BatchProgress,
    ) -> Vec<RepoOutcome> {
        let total = tasks.len();
        let mut outcomes = Vec::with_capacity(total);

        for (index, batch) in tasks.chunks(self.parallelism).enumerate() {
            let first = index * self.parallelism + 1;
            let last = first + batch.len() - 1;
            tracing::debug!("dispatching repositories {first}..={last} of {total}");
            progress.batch_started(first, last, total);

            let handles: Vec<_> = batch
                .iter()
                .cloned()
                .map(|task| {
                    let probe = self.probe.clone();
                    let name = task.name.clone();
                    let handle = tokio::task::spawn_blocking(move || probe.probe(&task));
                    (name, handle)
                })
                .collect();

            for (name, handle) in handles {
                let status = match handle.await {
                    Ok(status) => status,
                    Err(e) => {
                        tracing::warn!("update of {name} did not complete: {e}");
                        UpdateStatus::Exception(format!("update task failed: {e}"))
                    }
                };
                outcomes.push(RepoOutcome::new(name, status));
            }

            progress.batch_finished();
        }

        outcomes
    }
}
