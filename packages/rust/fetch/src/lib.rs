//! HTTP retrieval of guide documents, code snippets and shared fragments.
//!
//! [`HttpFetcher`] implements the [`Fetcher`] seam over `reqwest`. Every
//! request carries an explicit timeout and follows a bounded number of
//! redirects. A network failure or a 5xx response is retried; a 404 is
//! reported as [`GuideConverterError::NotFound`] straight away.

use std::time::Duration;

use guideconverter_shared::{Fetcher, GuideConverterError, Result};
use reqwest::{Client, StatusCode};
use tracing::{debug, warn};

/// Maximum number of redirects to follow.
const MAX_REDIRECTS: usize = 5;

/// Pause between a failed attempt and its retry.
const RETRY_DELAY: Duration = Duration::from_millis(250);

/// User-Agent string for all requests.
const USER_AGENT: &str = concat!("GuideConverter/", env!("CARGO_PKG_VERSION"));

// ---------------------------------------------------------------------------
// HttpFetcher
// ---------------------------------------------------------------------------

/// Fetches raw text over HTTP(S).
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    retries: u32,
}

impl HttpFetcher {
    /// Build a fetcher with a per-request timeout and extra attempts on
    /// transient failures.
    pub fn new(timeout_secs: u64, retries: u32) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| GuideConverterError::Network(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { client, retries })
    }

    /// One GET request. The error says whether a retry makes sense.
    async fn fetch_once(&self, url: &str) -> std::result::Result<String, Attempt> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| Attempt::Transient(GuideConverterError::Network(format!("{url}: {e}"))))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(Attempt::Final(GuideConverterError::NotFound {
                url: url.to_string(),
            }));
        }
        if !status.is_success() {
            let err = GuideConverterError::Network(format!("{url}: HTTP {status}"));
            return Err(if status.is_server_error() {
                Attempt::Transient(err)
            } else {
                Attempt::Final(err)
            });
        }

        response.text().await.map_err(|e| {
            Attempt::Transient(GuideConverterError::Network(format!(
                "{url}: failed to read body: {e}"
            )))
        })
    }
}

/// Outcome of a failed attempt.
enum Attempt {
    /// Worth retrying (connection problem, timeout, 5xx).
    Transient(GuideConverterError),
    /// Retrying cannot help (404, other 4xx).
    Final(GuideConverterError),
}

impl Fetcher for HttpFetcher {
    async fn fetch_lines(&self, url: &str) -> Result<Vec<String>> {
        let mut attempt = 0;
        loop {
            debug!(%url, attempt, "fetching");
            match self.fetch_once(url).await {
                Ok(body) => return Ok(split_lines(&body)),
                Err(Attempt::Final(err)) => return Err(err),
                Err(Attempt::Transient(err)) if attempt < self.retries => {
                    warn!(%url, error = %err, "fetch failed, retrying");
                    attempt += 1;
                    tokio::time::sleep(RETRY_DELAY).await;
                }
                Err(Attempt::Transient(err)) => return Err(err),
            }
        }
    }
}

/// Split a body into lines, dropping `\n` / `\r\n` terminators.
fn split_lines(body: &str) -> Vec<String> {
    body.lines().map(str::to_string).collect()
}
