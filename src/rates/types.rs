//! Exchange-rate data types.

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{RateError, RateResult};

/// A USD/BRL quote as emitted by the upstream provider.
///
/// Every field is kept as the upstream's text; numeric-looking values are
/// never parsed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(default)]
pub struct RateQuote {
    /// Quoted currency code (e.g. "USD").
    #[serde(deserialize_with = "nullable_text")]
    pub code: String,
    /// Counter currency code (e.g. "BRL").
    #[serde(deserialize_with = "nullable_text")]
    pub codein: String,
    /// Display name (e.g. "Dólar Americano/Real Brasileiro").
    #[serde(deserialize_with = "nullable_text")]
    pub name: String,
    #[serde(deserialize_with = "nullable_text")]
    pub high: String,
    #[serde(deserialize_with = "nullable_text")]
    pub low: String,
    #[serde(rename = "varBid", deserialize_with = "nullable_text")]
    pub var_bid: String,
    #[serde(rename = "pctChange", deserialize_with = "nullable_text")]
    pub pct_change: String,
    /// Price at which the quoted currency can be sold.
    #[serde(deserialize_with = "nullable_text")]
    pub bid: String,
    #[serde(deserialize_with = "nullable_text")]
    pub ask: String,
    /// Unix timestamp of the quote, as text.
    #[serde(deserialize_with = "nullable_text")]
    pub timestamp: String,
    #[serde(deserialize_with = "nullable_text")]
    pub create_date: String,
}

/// `null` reads as empty text.
fn nullable_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Top-level upstream document: `{"USDBRL": {...}}`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RateEnvelope {
    #[serde(rename = "USDBRL")]
    pub usd_brl: Option<RateQuote>,
}

impl RateEnvelope {
    /// Decode the raw upstream body.
    ///
    /// Missing or `null` values decode as empty text, at any level; only
    /// malformed JSON or a body of the wrong shape is an error.
    pub fn decode(body: &[u8]) -> RateResult<Self> {
        let envelope: Option<Self> =
            serde_json::from_slice(body).map_err(|e| RateError::Decode(e.to_string()))?;
        Ok(envelope.unwrap_or_default())
    }

    /// Take the USD/BRL quote out of the envelope.
    pub fn into_quote(self) -> RateQuote {
        self.usd_brl.unwrap_or_default()
    }
}

/// A quote as stored, with its store-assigned identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct PersistedRateRecord {
    pub id: i64,
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub quote: RateQuote,
}
