use std::sync::Arc;
use std::time::Instant;

use reqwest::Client;
use tracing::debug;

use crate::outcome::RequestOutcome;

/// Issues GET requests against one target, sharing a single client across
/// clones so workers reuse connections.
#[derive(Clone, Debug)]
pub struct RequestExecutor {
    client: Client,
    url: Arc<str>,
}

impl RequestExecutor {
    pub fn new(url: &str) -> Result<Self, reqwest::Error> {
        let client = Client::builder().build()?;
        Ok(Self {
            client,
            url: Arc::from(url),
        })
    }

    /// Performs one GET. Transport failures come back as status 0 with the time
    /// spent trying; any HTTP status is recorded verbatim.
    pub async fn execute(&self) -> RequestOutcome {
        let start = Instant::now();
        let result = self.client.get(&*self.url).send().await;
        let duration = start.elapsed();

        match result {
            Ok(response) => {
                let status = response.status().as_u16();
                // Reading the body to the end hands the connection back to the
                // pool; a body error does not change the recorded status.
                if let Err(e) = response.bytes().await {
                    debug!("Reading body from {} failed: {}", self.url, e);
                }
                RequestOutcome::status(status, duration)
            }
            Err(e) => {
                debug!("GET {} failed after {:?}: {}", self.url, duration, e);
                RequestOutcome::failed(duration)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn closed_port_url() -> String {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        format!("http://{addr}/")
    }

    #[tokio::test]
    async fn connection_refused_is_recorded_as_failure() {
        let executor = RequestExecutor::new(&closed_port_url()).unwrap();
        let outcome = executor.execute().await;
        assert!(outcome.is_failure());
    }
}
