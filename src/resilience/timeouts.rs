//! Timeout enforcement.
//!
//! # Responsibilities
//! - Define the three stage budgets (client, upstream fetch, persistence)
//! - Mint a fresh [`Deadline`] at the moment a stage begins
//! - Run a future bounded by that deadline
//!
//! # Design Decisions
//! - Uses Tokio's timeout facilities
//! - Deadlines never inherit from a caller's remaining budget; each stage
//!   starts its own wall-clock timer
//! - Expiry is reported as [`RateError::DeadlineExceeded`], distinct from
//!   transport errors

use std::future::Future;
use std::time::Duration;
use tokio::time::Instant;

use crate::error::{RateError, RateResult};

/// Overall budget for one client run.
pub const CLIENT_TIMEOUT: Duration = Duration::from_millis(300);

/// Budget for the server's call to the upstream rate provider.
pub const UPSTREAM_TIMEOUT: Duration = Duration::from_millis(200);

/// Budget for the server's insert into the rate store.
pub const PERSISTENCE_TIMEOUT: Duration = Duration::from_millis(10);

/// A wall-clock point after which the bounded work is abandoned.
#[derive(Debug, Clone, Copy)]
pub struct Deadline {
    at: Instant,
    budget: Duration,
}

impl Deadline {
    /// Start a new deadline `budget` from now.
    pub fn after(budget: Duration) -> Self {
        Self {
            at: Instant::now() + budget,
            budget,
        }
    }

    /// Whether the deadline has already passed.
    pub fn is_expired(&self) -> bool {
        Instant::now() >= self.at
    }

    /// Time left before expiry (zero once expired).
    pub fn remaining(&self) -> Duration {
        self.at.saturating_duration_since(Instant::now())
    }

    /// The budget this deadline was minted with.
    pub fn budget(&self) -> Duration {
        self.budget
    }

    /// Drive `fut` until it completes or the deadline passes.
    pub async fn run<F, T>(&self, fut: F) -> RateResult<T>
    where
        F: Future<Output = T>,
    {
        tokio::time::timeout_at(self.at, fut)
            .await
            .map_err(|_| RateError::DeadlineExceeded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_budgets_cascade() {
        assert!(CLIENT_TIMEOUT > UPSTREAM_TIMEOUT);
        assert!(UPSTREAM_TIMEOUT > PERSISTENCE_TIMEOUT);
    }

    #[tokio::test]
    async fn test_zero_budget_is_expired_immediately() {
        let deadline = Deadline::after(Duration::ZERO);
        assert!(deadline.is_expired());
        assert_eq!(deadline.remaining(), Duration::ZERO);
    }

    #[tokio::test]
    async fn test_run_completes_within_budget() {
        let deadline = Deadline::after(Duration::from_millis(200));
        let value = deadline.run(async { 42 }).await.unwrap();
        assert_eq!(value, 42);
        assert!(!deadline.is_expired());
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_reports_expiry() {
        let deadline = Deadline::after(PERSISTENCE_TIMEOUT);
        let result = deadline
            .run(tokio::time::sleep(Duration::from_millis(50)))
            .await;
        assert!(matches!(result, Err(RateError::DeadlineExceeded)));
        assert!(deadline.is_expired());
    }

    #[tokio::test(start_paused = true)]
    async fn test_deadlines_are_independent() {
        let outer = Deadline::after(CLIENT_TIMEOUT);
        tokio::time::advance(Duration::from_millis(250)).await;

        // A stage started now gets its full budget, not the outer remainder.
        let inner = Deadline::after(UPSTREAM_TIMEOUT);
        assert!(inner.remaining() > outer.remaining());
        assert_eq!(inner.budget(), UPSTREAM_TIMEOUT);
    }
}
