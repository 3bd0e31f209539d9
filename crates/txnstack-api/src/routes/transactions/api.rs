//! Transactions API endpoints
//!
//! Endpoints:
//! - api_transactions: filtered transaction list (JSON)
//! - api_transaction_detail: single transaction (JSON)

use axum::extract::{Path, Query, State};
use axum::Json;
use std::collections::HashMap;
use txnstack_core::{CoreError, Transaction, TransactionFilters};

use crate::error::ApiError;
use crate::extract::CurrentUser;
use crate::AppState;

/// List transactions (JSON API)
///
/// Query parameters:
/// - accountId: always honored
/// - startDate, endDate: ISO 8601 date or RFC 3339 timestamp
/// - category: exact, case-sensitive
/// - minAmount, maxAmount: inclusive decimal bounds
///
/// All but accountId are dropped while advanced filtering is off.
pub async fn api_transactions(
    State(state): State<AppState>,
    CurrentUser(ctx): CurrentUser,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<Vec<Transaction>>, ApiError> {
    // Reject malformed parameters before touching the store
    let filters = TransactionFilters::from_params(&params)?;

    let transactions = state
        .service
        .list_transactions(&ctx, &filters)
        .map_err(|e| match ApiError::from(e) {
            ApiError::InternalError { .. } => ApiError::InternalError {
                message: "Failed to retrieve transactions".to_string(),
            },
            other => other,
        })?;

    Ok(Json(transactions))
}

/// Get single transaction detail (JSON API)
pub async fn api_transaction_detail(
    State(state): State<AppState>,
    CurrentUser(ctx): CurrentUser,
    Path(transaction_id): Path<String>,
) -> Result<Json<Transaction>, ApiError> {
    if transaction_id.trim().is_empty() {
        return Err(ApiError::BadRequest {
            message: "Transaction ID is required".to_string(),
        });
    }

    match state.service.get_transaction_by_id(&ctx, &transaction_id) {
        Ok(tx) => Ok(Json(tx)),
        Err(CoreError::TransactionNotFound { id }) => {
            log::warn!("Transaction not found: txnId={} userId={}", id, ctx.user_id);
            Err(ApiError::NotFound {
                message: "Transaction not found".to_string(),
            })
        }
        Err(e) => Err(e.into()),
    }
}
