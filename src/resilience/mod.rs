//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Client run:       Deadline(300ms) ── GET /cotacao ──────────────┐
//! Server request:                     Deadline(200ms) ── upstream │
//!                                     Deadline(10ms)  ── insert   │
//! ```
//!
//! # Design Decisions
//! - Every external call has a deadline
//! - Deadlines are minted per stage and never composed
//! - No retries: a failed stage ends the pipeline

pub mod timeouts;

pub use timeouts::{Deadline, CLIENT_TIMEOUT, PERSISTENCE_TIMEOUT, UPSTREAM_TIMEOUT};
