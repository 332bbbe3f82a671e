pub mod config;
pub mod metrics;
pub mod progress;
pub mod report;
