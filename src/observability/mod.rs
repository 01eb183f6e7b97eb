//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! handler / provider / store
//!     → logging.rs (structured tracing events, request ID in every line)
//!     → metrics.rs (counters and histograms per stage outcome)
//! ```

pub mod logging;
pub mod metrics;

pub use logging::init_logging;
