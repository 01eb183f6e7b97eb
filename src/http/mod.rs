//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware)
//!     → request.rs (assign request ID)
//!     → quote.rs (cancel check → upstream fetch → persist → bid)
//!     → Send to client
//! ```

pub mod quote;
pub mod request;
pub mod server;

pub use quote::{run_pipeline, PipelineOutcome};
pub use request::X_REQUEST_ID;
pub use server::{AppState, RateServer, COTACAO_PATH};
