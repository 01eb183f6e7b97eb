//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, optional)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → ServerConfig / ClientConfig (validated, immutable)
//! ```
//!
//! # Design Decisions
//! - All fields have defaults to allow minimal configs
//! - Stage timeouts are not configurable

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, load_or_default, parse_config, ConfigError};
pub use schema::{
    ClientConfig, ListenerConfig, ObservabilityConfig, ServerConfig, StorageConfig,
    UpstreamConfig, DEFAULT_UPSTREAM_URL,
};
pub use validation::{Validate, ValidationError};
