//! HTTP probe logic.

use std::error::Error as _;
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use watchdog_core::FetchOutcome;

const USER_AGENT: &str = concat!("watchdog/", env!("CARGO_PKG_VERSION"));

/// Errors that prevent a probe from being constructed.
#[derive(Debug, thiserror::Error)]
pub enum ProbeError {
    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

/// Performs bounded GET requests and measures the responses.
#[derive(Debug, Clone)]
pub struct Prober {
    client: reqwest::Client,
    timeout: Duration,
}

impl Prober {
    /// Create a prober whose requests (body included) are capped at `timeout`.
    pub fn new(timeout: Duration) -> Result<Self, ProbeError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self { client, timeout })
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// GET `url`, read the whole body, and report status, size, and time.
    ///
    /// Elapsed time runs from sending the request until the last body byte.
    pub async fn fetch(&self, url: &str) -> FetchOutcome {
        debug!(%url, timeout = ?self.timeout, "probing target");
        let start = Instant::now();

        let response = match self.client.get(url).send().await {
            Ok(resp) => resp,
            Err(e) => {
                let error = describe(&e, self.timeout);
                warn!(%url, %error, "probe request failed");
                return FetchOutcome::failed(error);
            }
        };

        let status = response.status();
        let body = match response.bytes().await {
            Ok(body) => body,
            Err(e) => {
                let error = describe(&e, self.timeout);
                warn!(%url, %status, %error, "probe body read failed");
                return FetchOutcome::failed(error);
            }
        };
        let elapsed = start.elapsed().as_secs_f64();

        info!(
            %url,
            status = status.as_u16(),
            size = body.len(),
            elapsed_secs = elapsed,
            "probe completed"
        );
        FetchOutcome::response(status.as_u16(), body.len() as u64, elapsed)
    }
}

/// Flatten a reqwest error and its causes into one line.
fn describe(err: &reqwest::Error, timeout: Duration) -> String {
    if err.is_timeout() {
        return format!("request timed out after {timeout:?}");
    }

    let mut text = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let cause_text = cause.to_string();
        if !text.contains(&cause_text) {
            text.push_str(": ");
            text.push_str(&cause_text);
        }
        source = cause.source();
    }
    text
}
