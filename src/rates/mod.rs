//! Exchange-rate domain: quote types, the upstream provider and the store.

pub mod provider;
pub mod store;
pub mod types;

pub use provider::{shared_client, HttpRateProvider, RateProvider};
pub use store::{RateConnection, RateStore, SqliteRateConnection, SqliteRateStore};
pub use types::{PersistedRateRecord, RateEnvelope, RateQuote};
