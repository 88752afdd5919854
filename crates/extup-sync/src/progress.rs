use std::sync::Mutex;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

use crate::style::Styles;

/// Receives batch boundaries from the update engine.
pub trait BatchProgress: Send + Sync {
    /// A batch covering repositories `first..=last` (1-indexed) of `total` was dispatched.
    fn batch_started(&self, first: usize, last: usize, total: usize);

    /// Every repository in the current batch has finished.
    fn batch_finished(&self);
}

/// Discards progress.
#[derive(Debug, Default)]
pub struct NoProgress;

impl BatchProgress for NoProgress {
    fn batch_started(&self, _first: usize, _last: usize, _total: usize) {}

    fn batch_finished(&self) {}
}

/// Single self-overwriting spinner line, cleared at every batch barrier.
pub struct SpinnerProgress {
    style: ProgressStyle,
    current: Mutex<Option<ProgressBar>>,
}

impl SpinnerProgress {
    pub fn new(styles: &Styles) -> Self {
        let color = styles.progress_color();
        let style = ProgressStyle::with_template(&format!("{{spinner:.{color}}} {{msg:.{color}}}"))
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏ ");
        Self {
            style,
            current: Mutex::new(None),
        }
    }
}

impl BatchProgress for SpinnerProgress {
    fn batch_started(&self, first: usize, last: usize, _total: usize) {
        let pb = ProgressBar::new_spinner();
        pb.set_style(self.style.clone());
        pb.set_message(progress_message(first, last));
        pb.enable_steady_tick(Duration::from_millis(100));

        let mut current = self.current.lock().unwrap_or_else(|p| p.into_inner());
        if let Some(previous) = current.replace(pb) {
            previous.finish_and_clear();
        }
    }

    fn batch_finished(&self) {
        let mut current = self.current.lock().unwrap_or_else(|p| p.into_inner());
        if let Some(pb) = current.take() {
            pb.finish_and_clear();
        }
    }
}

pub fn progress_message(first: usize, last: usize) -> String {
    format!("Updating repository {first} to {last}...")
}
