//! Rate client: one deadline-bounded call to the server, then the artifact.
//!
//! # Flow
//! ```text
//! Deadline(300ms) minted
//!     → expired already? ── yes → "execution time exceeded", no request
//!     → GET /cotacao bound to the same deadline
//!     → 200? ── no → UnexpectedStatus, nothing written
//!     → read body (still bound) → Artifact::write_bid
//! ```
//!
//! No retries, and the artifact is only touched after a complete fetch.

pub mod artifact;

pub use artifact::{Artifact, ARTIFACT_PREFIX};

use reqwest::StatusCode;

use crate::error::{RateError, RateResult};
use crate::resilience::{Deadline, CLIENT_TIMEOUT};

/// Client for the server's quote endpoint.
#[derive(Clone)]
pub struct RateClient {
    http: reqwest::Client,
    url: String,
}

impl RateClient {
    /// Create a client calling `url` (the full `/cotacao` URL).
    pub fn new(http: reqwest::Client, url: impl Into<String>) -> Self {
        Self {
            http,
            url: url.into(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Fetch the raw bid body under `deadline`.
    pub async fn fetch_bid(&self, deadline: &Deadline) -> RateResult<Vec<u8>> {
        if deadline.is_expired() {
            return Err(RateError::DeadlineExceeded);
        }

        let request = self
            .http
            .get(&self.url)
            .build()
            .map_err(|e| RateError::RequestBuild(e.to_string()))?;

        let response = deadline
            .run(self.http.execute(request))
            .await?
            .map_err(|e| RateError::Transport(e.to_string()))?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(RateError::UnexpectedStatus {
                code: status.as_u16(),
            });
        }

        let body = deadline
            .run(response.bytes())
            .await?
            .map_err(|e| RateError::BodyRead(e.to_string()))?;

        Ok(body.to_vec())
    }

    /// One full run with the standard 300ms budget.
    pub async fn run(&self, artifact: &Artifact) -> RateResult<Vec<u8>> {
        self.run_with_deadline(Deadline::after(CLIENT_TIMEOUT), artifact)
            .await
    }

    /// One full run bounded by an already-minted deadline.
    ///
    /// Every failure is logged here; the returned error is for the caller's
    /// exit handling only.
    pub async fn run_with_deadline(
        &self,
        deadline: Deadline,
        artifact: &Artifact,
    ) -> RateResult<Vec<u8>> {
        if deadline.is_expired() {
            tracing::warn!(url = %self.url, "Execution time exceeded");
            return Err(RateError::DeadlineExceeded);
        }

        let bid = match self.fetch_bid(&deadline).await {
            Ok(bid) => bid,
            Err(e) => {
                tracing::error!(url = %self.url, error = %e, "Failed to get exchange rate");
                return Err(e);
            }
        };

        if let Err(e) = artifact.write_bid(&bid).await {
            tracing::error!(
                path = %artifact.path().display(),
                error = %e,
                "Failed to create exchange rate file"
            );
            return Err(e);
        }

        tracing::info!(
            path = %artifact.path().display(),
            bid = %String::from_utf8_lossy(&bid),
            "Exchange rate written"
        );
        Ok(bid)
    }
}
