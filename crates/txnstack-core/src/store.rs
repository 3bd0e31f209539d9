//! In-memory transaction store, filled once at startup

use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard};

use txnstack_loader::TransactionSource;

use crate::error::{CoreError, CoreResult};
use crate::models::Transaction;

#[derive(Debug, Default)]
struct StoreData {
    /// Load order is kept; ties in sorted results fall back to it
    transactions: Vec<Transaction>,
    index: HashMap<String, usize>,
}

/// Transactions keyed by id, read-only after load.
///
/// Reads go through an `RwLock` so a future write path only has to take
/// the write side.
#[derive(Debug, Default)]
pub struct TransactionStore {
    data: RwLock<StoreData>,
}

impl TransactionStore {
    /// Build a store from already-converted transactions. Duplicate ids are rejected.
    pub fn from_transactions(transactions: Vec<Transaction>) -> CoreResult<Self> {
        let mut index = HashMap::with_capacity(transactions.len());
        for (position, tx) in transactions.iter().enumerate() {
            if index.insert(tx.id.clone(), position).is_some() {
                return Err(CoreError::DuplicateEntry { entry: tx.id.clone() });
            }
        }

        Ok(Self {
            data: RwLock::new(StoreData { transactions, index }),
        })
    }

    /// Read and validate every record from `source`.
    ///
    /// Any unreadable or malformed record fails the whole load.
    pub async fn load(source: &dyn TransactionSource) -> CoreResult<Self> {
        let records = source.load().await?;
        let transactions = records
            .into_iter()
            .map(Transaction::try_from)
            .collect::<CoreResult<Vec<_>>>()?;

        let store = Self::from_transactions(transactions)?;
        log::info!("Loaded {} transactions from {}", store.len(), source.describe());
        Ok(store)
    }

    fn read(&self) -> CoreResult<RwLockReadGuard<'_, StoreData>> {
        self.data.read().map_err(|_| CoreError::InternalError {
            message: "transaction store lock poisoned".to_string(),
        })
    }

    /// Look up one transaction by id
    pub fn get_by_id(&self, id: &str) -> CoreResult<Transaction> {
        let data = self.read()?;
        data.index
            .get(id)
            .map(|&position| data.transactions[position].clone())
            .ok_or_else(|| CoreError::TransactionNotFound { id: id.to_string() })
    }

    /// Every transaction accepted by `predicate`, in load order
    pub fn scan<F>(&self, predicate: F) -> CoreResult<Vec<Transaction>>
    where
        F: Fn(&Transaction) -> bool,
    {
        let data = self.read()?;
        Ok(data
            .transactions
            .iter()
            .filter(|tx| predicate(tx))
            .cloned()
            .collect())
    }

    pub fn len(&self) -> usize {
        self.data
            .read()
            .map(|data| data.transactions.len())
            .unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use txnstack_loader::{StaticSource, TransactionRecord};

    fn record(id: &str, date: &str, amount: i64) -> TransactionRecord {
        TransactionRecord {
            id: id.to_string(),
            account_id: "acc-001".to_string(),
            date: date.to_string(),
            amount: Decimal::from(amount),
            category: "General".to_string(),
            description: format!("record {}", id),
            merchant: None,
            currency: None,
            transaction_type: None,
            status: None,
        }
    }

    #[tokio::test]
    async fn test_load_and_lookup_round_trip() {
        let records = vec![
            record("txn-1", "2024-01-01", 10),
            record("txn-2", "2024-03-01", 20),
            record("txn-3", "2024-02-01", 30),
        ];
        let expected: Vec<Transaction> = records
            .iter()
            .cloned()
            .map(|r| Transaction::try_from(r).unwrap())
            .collect();

        let store = TransactionStore::load(&StaticSource::new(records)).await.unwrap();
        assert_eq!(store.len(), 3);

        for tx in &expected {
            assert_eq!(&store.get_by_id(&tx.id).unwrap(), tx);
        }

        let err = store.get_by_id("txn-404").unwrap_err();
        assert!(matches!(err, CoreError::TransactionNotFound { ref id } if id == "txn-404"));
    }

    #[tokio::test]
    async fn test_scan_keeps_load_order() {
        let store = TransactionStore::load(&StaticSource::new(vec![
            record("b", "2024-01-01", 1),
            record("a", "2024-01-01", 2),
            record("c", "2024-01-01", 3),
        ]))
        .await
        .unwrap();

        let ids: Vec<String> = store.scan(|_| true).unwrap().into_iter().map(|t| t.id).collect();
        assert_eq!(ids, vec!["b", "a", "c"]);

        let big = store.scan(|t| t.amount >= Decimal::from(2)).unwrap();
        assert_eq!(big.len(), 2);
    }

    #[tokio::test]
    async fn test_duplicate_ids_rejected() {
        let err = TransactionStore::load(&StaticSource::new(vec![
            record("dup", "2024-01-01", 1),
            record("dup", "2024-01-02", 2),
        ]))
        .await
        .unwrap_err();
        assert!(matches!(err, CoreError::DuplicateEntry { ref entry } if entry == "dup"));
    }

    #[tokio::test]
    async fn test_bad_record_fails_load() {
        let err = TransactionStore::load(&StaticSource::new(vec![
            record("ok", "2024-01-01", 1),
            record("bad", "not-a-date", 2),
        ]))
        .await
        .unwrap_err();
        assert!(matches!(err, CoreError::InvalidFormat { .. }));
    }

    #[test]
    fn test_empty_store() {
        let store = TransactionStore::default();
        assert!(store.is_empty());
        assert!(store.scan(|_| true).unwrap().is_empty());
    }
}
