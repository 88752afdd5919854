pub mod config;
pub mod diagnostic_log;
pub mod error;
pub mod models;
