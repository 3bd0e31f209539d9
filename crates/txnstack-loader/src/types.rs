//! On-disk record layout

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One transaction exactly as it appears in the data file.
///
/// Dates stay as text here; the core validates and converts them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRecord {
    pub id: String,
    pub account_id: String,
    /// RFC 3339 timestamp or plain `YYYY-MM-DD`
    pub date: String,
    pub amount: Decimal,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub merchant: Option<String>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default, rename = "type")]
    pub transaction_type: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}
