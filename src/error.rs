use thiserror::Error;

/// Rejected configuration. Always raised before any worker is spawned.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("`--url` must not be empty")]
    EmptyUrl,

    #[error("invalid `--url` `{url}`: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("`--requests` must be a positive integer")]
    InvalidRequests,

    #[error("`--concurrency` must be a positive integer")]
    InvalidConcurrency,
}

#[derive(Debug, Error)]
pub enum RunError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to create latency histogram: {0}")]
    Histogram(#[from] hdrhistogram::CreationError),

    #[error("worker task failed: {0}")]
    WorkerPanicked(#[from] tokio::task::JoinError),

    #[error("aggregator task failed: {0}")]
    AggregatorPanicked(tokio::task::JoinError),
}
