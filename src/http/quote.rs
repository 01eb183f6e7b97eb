//! `GET /cotacao`: fetch, persist, answer with the bid.
//!
//! # Pipeline
//! ```text
//! Received → CheckCancelled ──(done)──────────────────────────→ Abandoned
//!               │
//!               ▼
//!           Fetching (200ms) ──(error)────────────────────────→ Responded(400/500)
//!               │
//!               ▼
//!           Persisting: setup ──(error)───────────────────────→ Responded(500)
//!                       insert (10ms) ──(error/expired: logged)─┐
//!               │                                               │
//!               ▼                                               ▼
//!           Responded(200, bid) ◀───────────────────────────────┘
//! ```
//!
//! Insert failures are logged and swallowed: the caller still gets the bid.
//! Whether callers should ever learn about a lost write is unresolved; until
//! then persistence stays fire-and-forget.

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use std::time::Instant;

use crate::error::{RateError, RateResult};
use crate::http::request::request_id;
use crate::http::server::AppState;
use crate::observability::metrics;
use crate::rates::RateQuote;
use crate::resilience::{Deadline, PERSISTENCE_TIMEOUT};

/// How one pass through the pipeline ended.
#[derive(Debug)]
pub enum PipelineOutcome {
    /// The inbound context was already done; nothing was attempted.
    Abandoned,
    /// A stage failed; no bid is returned.
    Failed(RateError),
    /// The bid to return.
    Served(String),
}

/// Handler for `GET /cotacao`.
pub async fn get_cotacao(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let start = Instant::now();
    let request_id = request_id(&headers);

    match run_pipeline(&state, &request_id).await {
        PipelineOutcome::Abandoned => {
            tracing::info!(request_id = %request_id, "Request context done, abandoning");
            metrics::record_request("abandoned", StatusCode::OK.as_u16(), start);
            ().into_response()
        }
        PipelineOutcome::Failed(e) => {
            let status = e.status_code();
            tracing::error!(
                request_id = %request_id,
                status = status.as_u16(),
                error = %e,
                "Failed to serve exchange rate"
            );
            metrics::record_request(e.kind(), status.as_u16(), start);
            e.into_response()
        }
        PipelineOutcome::Served(bid) => {
            tracing::info!(
                request_id = %request_id,
                bid = %bid,
                elapsed_ms = start.elapsed().as_millis() as u64,
                "Exchange rate served"
            );
            metrics::record_request("ok", StatusCode::OK.as_u16(), start);
            bid.into_response()
        }
    }
}

/// Run the fetch → persist pipeline for one request.
pub async fn run_pipeline(state: &AppState, request_id: &str) -> PipelineOutcome {
    if state.shutdown.is_triggered() {
        return PipelineOutcome::Abandoned;
    }

    let quote = match state.provider.fetch().await {
        Ok(quote) => quote,
        Err(e) => return PipelineOutcome::Failed(e),
    };

    if let Err(e) = persist(state, &quote, request_id).await {
        return PipelineOutcome::Failed(e);
    }

    PipelineOutcome::Served(quote.bid)
}

/// Open the store and insert `quote` under a fresh persistence deadline.
///
/// Only setup errors are returned; insert errors and expiry are logged.
async fn persist(state: &AppState, quote: &RateQuote, request_id: &str) -> RateResult<()> {
    let mut conn = match state.store.connect().await {
        Ok(conn) => conn,
        Err(e) => {
            tracing::error!(request_id = %request_id, error = %e, "Error connecting to rate store");
            metrics::record_persist("setup_failed");
            return Err(e);
        }
    };

    let deadline = Deadline::after(PERSISTENCE_TIMEOUT);
    match deadline.run(conn.insert(quote)).await {
        Ok(Ok(record)) => {
            tracing::info!(request_id = %request_id, id = record.id, "Exchange rate saved to store");
            metrics::record_persist("ok");
        }
        Ok(Err(e)) => {
            tracing::warn!(request_id = %request_id, error = %e, "Exchange rate not saved, continuing");
            metrics::record_persist("write_failed");
        }
        Err(e) => {
            tracing::warn!(
                request_id = %request_id,
                budget_ms = PERSISTENCE_TIMEOUT.as_millis() as u64,
                error = %e,
                "Exchange rate insert exceeded its deadline, continuing"
            );
            metrics::record_persist("deadline_exceeded");
        }
    }

    Ok(())
}
