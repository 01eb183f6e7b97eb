//! Exchange-rate relay with independent, cascading deadlines.
//!
//! # Architecture Overview
//!
//! ```text
//!   cotacao-client                cotacao (server)                 upstream API
//!  ┌──────────────┐  GET /cotacao ┌────────────────────┐   GET    ┌────────────┐
//!  │ Deadline     │──────────────▶│ cancel check       │─────────▶│ USD-BRL    │
//!  │ 300ms        │               │ fetch   Deadline   │◀─────────│ JSON       │
//!  │              │               │         200ms      │          └────────────┘
//!  │              │               │ persist Deadline   │  INSERT  ┌────────────┐
//!  │              │◀──────────────│         10ms       │─────────▶│ SQLite     │
//!  └──────┬───────┘   bid text    └────────────────────┘          └────────────┘
//!         ▼
//!   cotacao.txt ("Dólar: <bid>")
//! ```
//!
//! Each deadline is minted when its stage begins and is never derived from a
//! caller's remaining budget.

pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod rates;
pub mod resilience;

pub use client::{Artifact, RateClient};
pub use config::{ClientConfig, ServerConfig};
pub use error::{RateError, RateResult};
pub use http::RateServer;
pub use lifecycle::Shutdown;
