pub mod engine;
pub mod git_ops;
pub mod main_project;
pub mod probe;
pub mod progress;
pub mod report;
pub mod style;

#[cfg(all(test, unix))]
pub(crate) mod test_support;
