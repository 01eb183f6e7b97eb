//! Upstream exchange-rate provider.
//!
//! # Responsibilities
//! - Issue one GET to the upstream rate API under a fresh 200ms deadline
//! - Classify failures by where they happened (build, send, read, decode)
//!
//! # Design Decisions
//! - The deadline starts when the fetch starts; it is never derived from the
//!   inbound request
//! - The upstream status code is not checked; the body is decoded as-is
//! - One process-wide `reqwest::Client` is shared read-only across requests

use async_trait::async_trait;
use std::sync::OnceLock;
use std::time::Instant;

use crate::error::{RateError, RateResult};
use crate::observability::metrics;
use crate::rates::types::{RateEnvelope, RateQuote};
use crate::resilience::{Deadline, UPSTREAM_TIMEOUT};

/// Source of current exchange-rate quotes.
#[async_trait]
pub trait RateProvider: Send + Sync {
    /// Fetch the current USD/BRL quote.
    async fn fetch(&self) -> RateResult<RateQuote>;
}

static SHARED_CLIENT: OnceLock<reqwest::Client> = OnceLock::new();

/// Process-wide pooled HTTP client, built on first use.
pub fn shared_client() -> &'static reqwest::Client {
    SHARED_CLIENT.get_or_init(reqwest::Client::new)
}

/// Fetches quotes from an HTTP JSON endpoint.
#[derive(Clone)]
pub struct HttpRateProvider {
    client: reqwest::Client,
    url: String,
}

impl HttpRateProvider {
    /// Create a provider for `url` using the given client.
    pub fn new(client: reqwest::Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }

    /// Create a provider for `url` on the process-wide client.
    pub fn with_shared_client(url: impl Into<String>) -> Self {
        Self::new(shared_client().clone(), url)
    }

    /// The upstream URL this provider calls.
    pub fn url(&self) -> &str {
        &self.url
    }

    async fn fetch_raw(&self, deadline: &Deadline) -> RateResult<Vec<u8>> {
        let request = self
            .client
            .get(&self.url)
            .build()
            .map_err(|e| RateError::RequestBuild(e.to_string()))?;

        let response = match deadline.run(self.client.execute(request)).await {
            Ok(Ok(response)) => response,
            Ok(Err(e)) => return Err(RateError::Transport(e.to_string())),
            Err(_) => {
                return Err(RateError::Transport(format!(
                    "upstream did not respond within {}ms",
                    deadline.budget().as_millis()
                )))
            }
        };

        match deadline.run(response.bytes()).await {
            Ok(Ok(body)) => Ok(body.to_vec()),
            Ok(Err(e)) => Err(RateError::BodyRead(e.to_string())),
            Err(_) => Err(RateError::BodyRead(format!(
                "upstream body not received within {}ms",
                deadline.budget().as_millis()
            ))),
        }
    }
}

#[async_trait]
impl RateProvider for HttpRateProvider {
    async fn fetch(&self) -> RateResult<RateQuote> {
        let start = Instant::now();
        let deadline = Deadline::after(UPSTREAM_TIMEOUT);

        let result = self
            .fetch_raw(&deadline)
            .await
            .and_then(|body| RateEnvelope::decode(&body))
            .map(RateEnvelope::into_quote);

        match &result {
            Ok(quote) => {
                tracing::debug!(
                    url = %self.url,
                    bid = %quote.bid,
                    elapsed_ms = start.elapsed().as_millis() as u64,
                    "Upstream rate fetched"
                );
                metrics::record_upstream_fetch("ok", start);
            }
            Err(e) => {
                tracing::warn!(
                    url = %self.url,
                    error = %e,
                    elapsed_ms = start.elapsed().as_millis() as u64,
                    "Upstream rate fetch failed"
                );
                metrics::record_upstream_fetch(e.kind(), start);
            }
        }

        result
    }
}
