//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (main.rs):
//!     Load config → Validate → Init logging/metrics → Bind → Serve
//!
//! Shutdown (shutdown.rs):
//!     Ctrl+C → Shutdown::trigger → new requests abandoned → serve drains → exit
//! ```

pub mod shutdown;

pub use shutdown::{trigger_on_ctrl_c, Shutdown};
