//! Transaction queries with feature-gated filtering

use std::sync::Arc;

use txnstack_flags::FeatureGate;

use crate::error::CoreResult;
use crate::filter::TransactionFilters;
use crate::models::{RequestContext, Transaction};
use crate::store::TransactionStore;

/// Answers transaction queries against the store, honoring only the
/// filters the feature gate currently allows.
#[derive(Debug, Clone)]
pub struct TransactionService {
    store: Arc<TransactionStore>,
    gate: Arc<FeatureGate>,
}

impl TransactionService {
    pub fn new(store: Arc<TransactionStore>, gate: Arc<FeatureGate>) -> Self {
        Self { store, gate }
    }

    /// Look up a single transaction
    pub fn get_transaction_by_id(&self, ctx: &RequestContext, id: &str) -> CoreResult<Transaction> {
        log::debug!("user={} lookup transaction {}", ctx.user_id, id);
        self.store.get_by_id(id)
    }

    /// Transactions matching `requested`, most recent first.
    ///
    /// The gate is read exactly once, so one response never mixes gate
    /// states. Equal dates keep store order.
    pub fn list_transactions(
        &self,
        ctx: &RequestContext,
        requested: &TransactionFilters,
    ) -> CoreResult<Vec<Transaction>> {
        let advanced_enabled = self.gate.is_advanced_filtering_enabled();
        let effective = requested.effective(advanced_enabled);

        if advanced_enabled {
            log::debug!("user={} using advanced filters: {:?}", ctx.user_id, effective);
        } else {
            if requested.has_advanced() {
                log::info!(
                    "user={} requested advanced filters but the flag is disabled, only accountId will be applied",
                    ctx.user_id
                );
            }
            log::debug!(
                "user={} using basic filters only: accountId={:?}",
                ctx.user_id,
                effective.account_id
            );
        }

        let mut transactions = self.store.scan(|tx| effective.matches(tx))?;
        transactions.sort_by(|a, b| b.date.cmp(&a.date));

        log::info!("user={} retrieved {} transactions", ctx.user_id, transactions.len());
        Ok(transactions)
    }
}

// ==================== Tests ====================
