//! Fixed-budget HTTP load generator.
//!
//! A run splits `total_requests` GET requests across `concurrency` workers,
//! funnels every outcome through one channel and summarizes them once the
//! slowest worker is done.

pub mod aggregator;
pub mod config;
pub mod error;
pub mod executor;
pub mod outcome;
pub mod report;
pub mod runner;

pub use aggregator::Aggregator;
pub use config::RunConfig;
pub use error::{ConfigError, RunError};
pub use executor::RequestExecutor;
pub use outcome::{LatencySummary, RequestOutcome, RunSummary, WorkerAssignment};
pub use runner::{dispatch, run_worker, split_requests, RunPhase};
