//! Core data models

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use txnstack_loader::TransactionRecord;

use crate::error::CoreError;
use crate::time::parse_timestamp;
use crate::types::{TransactionStatus, TransactionType};

/// Currency assumed when a record does not name one
pub const DEFAULT_CURRENCY: &str = "USD";

/// A financial transaction. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// Unique transaction identifier
    pub id: String,
    /// Owning account
    pub account_id: String,
    /// Booking timestamp (UTC)
    pub date: DateTime<Utc>,
    /// Signed amount; negative for money leaving the account
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    pub category: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub merchant: Option<String>,
    pub currency: String,
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    pub status: TransactionStatus,
}

impl TryFrom<TransactionRecord> for Transaction {
    type Error = CoreError;

    fn try_from(record: TransactionRecord) -> Result<Self, Self::Error> {
        if record.id.trim().is_empty() {
            return Err(CoreError::InvalidFormat {
                message: "transaction with empty id".to_string(),
            });
        }

        let date = parse_timestamp(&record.date).ok_or_else(|| CoreError::InvalidFormat {
            message: format!("transaction {} has invalid date '{}'", record.id, record.date),
        })?;

        let transaction_type = match record.transaction_type.as_deref() {
            Some(raw) => raw.parse::<TransactionType>().map_err(|e| CoreError::InvalidFormat {
                message: format!("transaction {}: {}", record.id, e),
            })?,
            None if record.amount.is_sign_negative() => TransactionType::Debit,
            None => TransactionType::Credit,
        };

        let status = match record.status.as_deref() {
            Some(raw) => raw.parse::<TransactionStatus>().map_err(|e| CoreError::InvalidFormat {
                message: format!("transaction {}: {}", record.id, e),
            })?,
            None => TransactionStatus::default(),
        };

        Ok(Transaction {
            id: record.id,
            account_id: record.account_id,
            date,
            amount: record.amount,
            category: record.category,
            description: record.description,
            merchant: record.merchant,
            currency: record.currency.unwrap_or_else(|| DEFAULT_CURRENCY.to_string()),
            transaction_type,
            status,
        })
    }
}

/// Caller identity, passed explicitly down the request path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestContext {
    pub user_id: String,
}

impl RequestContext {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::str::FromStr;

    fn record() -> TransactionRecord {
        TransactionRecord {
            id: "txn-001".to_string(),
            account_id: "acc-001".to_string(),
            date: "2024-03-01T10:30:00Z".to_string(),
            amount: Decimal::from_str("-45.67").unwrap(),
            category: "Groceries".to_string(),
            description: "Weekly shop".to_string(),
            merchant: Some("Fresh Market".to_string()),
            currency: None,
            transaction_type: None,
            status: None,
        }
    }

    #[test]
    fn test_record_conversion_defaults() {
        let tx = Transaction::try_from(record()).unwrap();
        assert_eq!(tx.date, Utc.with_ymd_and_hms(2024, 3, 1, 10, 30, 0).unwrap());
        assert_eq!(tx.currency, "USD");
        assert_eq!(tx.transaction_type, TransactionType::Debit);
        assert_eq!(tx.status, TransactionStatus::Posted);
    }

    #[test]
    fn test_record_conversion_explicit_fields() {
        let mut raw = record();
        raw.amount = Decimal::from(100);
        raw.currency = Some("EUR".to_string());
        raw.transaction_type = Some("credit".to_string());
        raw.status = Some("pending".to_string());

        let tx = Transaction::try_from(raw).unwrap();
        assert_eq!(tx.currency, "EUR");
        assert_eq!(tx.transaction_type, TransactionType::Credit);
        assert_eq!(tx.status, TransactionStatus::Pending);
    }

    #[test]
    fn test_record_conversion_rejects_bad_date() {
        let mut raw = record();
        raw.date = "yesterday".to_string();
        let err = Transaction::try_from(raw).unwrap_err();
        assert!(matches!(err, CoreError::InvalidFormat { .. }));
        assert!(err.to_string().contains("yesterday"));
    }

    #[test]
    fn test_record_conversion_rejects_bad_type() {
        let mut raw = record();
        raw.transaction_type = Some("refund".to_string());
        assert!(Transaction::try_from(raw).is_err());
    }

    #[test]
    fn test_json_shape() {
        let tx = Transaction::try_from(record()).unwrap();
        let json = serde_json::to_value(&tx).unwrap();

        assert_eq!(json["accountId"], "acc-001");
        assert!((json["amount"].as_f64().unwrap() + 45.67).abs() < 1e-9);
        assert_eq!(json["type"], "debit");
        assert_eq!(json["status"], "posted");
        assert_eq!(json["date"], "2024-03-01T10:30:00Z");
    }
}
