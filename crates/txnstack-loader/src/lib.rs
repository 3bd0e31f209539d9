//! Transaction record sources
//!
//! The store is filled once at startup from a [`TransactionSource`].
//! The default source reads a JSON array from disk.

use async_trait::async_trait;
use std::path::PathBuf;

pub mod error;
pub mod types;

pub use error::LoadError;
pub use types::TransactionRecord;

/// Trait for transaction record sources
#[async_trait]
pub trait TransactionSource: Send + Sync {
    /// Human-readable location, used in logs
    fn describe(&self) -> String;

    /// Read every record, in source order
    async fn load(&self) -> Result<Vec<TransactionRecord>, LoadError>;
}

/// Parse a JSON array of transaction records
pub fn parse_records(content: &str, location: &str) -> Result<Vec<TransactionRecord>, LoadError> {
    serde_json::from_str(content).map_err(|e| LoadError::Syntax {
        location: location.to_string(),
        message: e.to_string(),
    })
}

/// Reads `transactions.json`-style files
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }
}

#[async_trait]
impl TransactionSource for JsonFileSource {
    fn describe(&self) -> String {
        self.path.to_string_lossy().to_string()
    }

    async fn load(&self) -> Result<Vec<TransactionRecord>, LoadError> {
        let content = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|source| LoadError::Io {
                path: self.describe(),
                source,
            })?;

        parse_records(&content, &self.describe())
    }
}

/// Fixed in-memory records
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    records: Vec<TransactionRecord>,
}

impl StaticSource {
    pub fn new(records: Vec<TransactionRecord>) -> Self {
        Self { records }
    }
}

#[async_trait]
impl TransactionSource for StaticSource {
    fn describe(&self) -> String {
        format!("static ({} records)", self.records.len())
    }

    async fn load(&self) -> Result<Vec<TransactionRecord>, LoadError> {
        Ok(self.records.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use std::io::Write;
    use std::str::FromStr;

    const SAMPLE: &str = r#"[
        {
            "id": "txn-001",
            "accountId": "acc-001",
            "date": "2024-03-01T10:30:00Z",
            "amount": -45.67,
            "category": "Groceries",
            "description": "Weekly shop",
            "merchant": "Fresh Market",
            "type": "debit",
            "status": "posted"
        },
        {
            "id": "txn-002",
            "accountId": "acc-002",
            "date": "2024-02-01",
            "amount": 2500,
            "category": "Income",
            "description": "Salary"
        }
    ]"#;

    #[test]
    fn test_parse_records() {
        let records = parse_records(SAMPLE, "inline").unwrap();
        assert_eq!(records.len(), 2);

        let first = &records[0];
        assert_eq!(first.account_id, "acc-001");
        assert_eq!(first.amount, Decimal::from_str("-45.67").unwrap());
        assert_eq!(first.merchant.as_deref(), Some("Fresh Market"));
        assert_eq!(first.transaction_type.as_deref(), Some("debit"));

        let second = &records[1];
        assert_eq!(second.amount, Decimal::from(2500));
        assert!(second.merchant.is_none());
        assert!(second.currency.is_none());
    }

    #[test]
    fn test_parse_records_rejects_garbage() {
        let err = parse_records("{not json", "inline").unwrap_err();
        assert!(matches!(err, LoadError::Syntax { ref location, .. } if location == "inline"));
    }

    #[test]
    fn test_parse_records_requires_id() {
        let err = parse_records(r#"[{"accountId": "a", "date": "2024-01-01", "amount": 1}]"#, "inline");
        assert!(err.is_err());
    }

    #[tokio::test]
    async fn test_json_file_source() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();

        let source = JsonFileSource::new(file.path());
        let records = source.load().await.unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].id, "txn-001");
    }

    #[tokio::test]
    async fn test_json_file_source_missing_file() {
        let source = JsonFileSource::new("/no/such/dir/transactions.json");
        let err = source.load().await.unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
        assert!(err.to_string().contains("/no/such/dir/transactions.json"));
    }
}
