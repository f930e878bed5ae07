use url::Url;

use crate::error::ConfigError;

/// Validated run parameters. Only constructible through [`RunConfig::new`],
/// so holding one means the run is allowed to start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    url: String,
    total_requests: u64,
    concurrency: usize,
}

impl RunConfig {
    pub fn new(
        url: impl Into<String>,
        total_requests: u64,
        concurrency: usize,
    ) -> Result<Self, ConfigError> {
        let url = url.into().trim().to_string();
        if url.is_empty() {
            return Err(ConfigError::EmptyUrl);
        }

        let parsed = Url::parse(&url).map_err(|e| ConfigError::InvalidUrl {
            url: url.clone(),
            reason: e.to_string(),
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidUrl {
                reason: format!("unsupported scheme `{}`", parsed.scheme()),
                url,
            });
        }

        if total_requests == 0 {
            return Err(ConfigError::InvalidRequests);
        }
        // More workers than requests is allowed; the extras get a zero share.
        if concurrency == 0 {
            return Err(ConfigError::InvalidConcurrency);
        }

        Ok(Self {
            url,
            total_requests,
            concurrency,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn total_requests(&self) -> u64 {
        self.total_requests
    }

    pub fn concurrency(&self) -> usize {
        self.concurrency
    }
}
