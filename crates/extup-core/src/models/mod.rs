pub mod outcome;
pub mod task;
