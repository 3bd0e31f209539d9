//! Transaction filter sets and their evaluation
//!
//! A [`TransactionFilters`] value is a conjunction of optional constraints.
//! Only the account constraint is basic; the other five are "advanced" and
//! take effect only while the feature gate allows them.

use chrono::{DateTime, Utc};
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::str::FromStr;

use crate::error::{CoreError, CoreResult};
use crate::models::Transaction;
use crate::time::parse_timestamp;

/// Query parameter names
pub mod params {
    pub const ACCOUNT_ID: &str = "accountId";
    pub const START_DATE: &str = "startDate";
    pub const END_DATE: &str = "endDate";
    pub const CATEGORY: &str = "category";
    pub const MIN_AMOUNT: &str = "minAmount";
    pub const MAX_AMOUNT: &str = "maxAmount";
}

/// Optional constraints on transactions. `None` means unconstrained.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionFilters {
    pub account_id: Option<String>,
    /// Inclusive lower bound on the transaction date
    pub start_date: Option<DateTime<Utc>>,
    /// Inclusive upper bound on the transaction date
    pub end_date: Option<DateTime<Utc>>,
    /// Case-sensitive exact category
    pub category: Option<String>,
    /// Inclusive lower bound on the amount
    pub min_amount: Option<Decimal>,
    /// Inclusive upper bound on the amount
    pub max_amount: Option<Decimal>,
}

impl TransactionFilters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn for_account(mut self, account_id: impl Into<String>) -> Self {
        self.account_id = Some(account_id.into());
        self
    }

    pub fn with_date_range(mut self, start: Option<DateTime<Utc>>, end: Option<DateTime<Utc>>) -> Self {
        self.start_date = start;
        self.end_date = end;
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_amount_range(mut self, min: Option<Decimal>, max: Option<Decimal>) -> Self {
        self.min_amount = min;
        self.max_amount = max;
        self
    }

    /// Build a filter set from raw query parameters.
    ///
    /// Unknown keys are ignored and empty values count as absent. The first
    /// malformed date or amount fails the whole set.
    pub fn from_params(query: &HashMap<String, String>) -> CoreResult<Self> {
        let value = |key: &str| param(query, key);

        Ok(Self {
            account_id: value(params::ACCOUNT_ID).map(str::to_string),
            start_date: value(params::START_DATE)
                .map(|v| parse_date_param(params::START_DATE, v))
                .transpose()?,
            end_date: value(params::END_DATE)
                .map(|v| parse_date_param(params::END_DATE, v))
                .transpose()?,
            category: value(params::CATEGORY).map(str::to_string),
            min_amount: value(params::MIN_AMOUNT)
                .map(|v| parse_amount_param(params::MIN_AMOUNT, v))
                .transpose()?,
            max_amount: value(params::MAX_AMOUNT)
                .map(|v| parse_amount_param(params::MAX_AMOUNT, v))
                .transpose()?,
        })
    }

    /// True when any gated constraint is set
    pub fn has_advanced(&self) -> bool {
        self.start_date.is_some()
            || self.end_date.is_some()
            || self.category.as_deref().is_some_and(|c| !c.is_empty())
            || self.min_amount.is_some()
            || self.max_amount.is_some()
    }

    /// The filter set that actually applies for the given gate state.
    ///
    /// The account constraint always survives; everything else is dropped
    /// unless `advanced_enabled`.
    pub fn effective(&self, advanced_enabled: bool) -> TransactionFilters {
        if advanced_enabled {
            return self.clone();
        }

        TransactionFilters {
            account_id: self.account_id.clone(),
            ..TransactionFilters::default()
        }
    }

    /// Whether `tx` satisfies every constraint that is set
    pub fn matches(&self, tx: &Transaction) -> bool {
        if let Some(account_id) = self.account_id.as_deref().filter(|a| !a.is_empty()) {
            if account_id != tx.account_id {
                return false;
            }
        }

        if let Some(start) = self.start_date {
            if tx.date < start {
                return false;
            }
        }

        if let Some(end) = self.end_date {
            if tx.date > end {
                return false;
            }
        }

        if let Some(category) = self.category.as_deref().filter(|c| !c.is_empty()) {
            if category != tx.category {
                return false;
            }
        }

        if let Some(min) = self.min_amount {
            if tx.amount < min {
                return false;
            }
        }

        if let Some(max) = self.max_amount {
            if tx.amount > max {
                return false;
            }
        }

        true
    }
}

fn param<'q>(query: &'q HashMap<String, String>, key: &str) -> Option<&'q str> {
    query
        .get(key)
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
}

fn parse_date_param(field: &str, value: &str) -> CoreResult<DateTime<Utc>> {
    parse_timestamp(value).ok_or_else(|| {
        CoreError::validation(field, "Use ISO 8601 (YYYY-MM-DD or RFC3339)")
    })
}

/// Amounts follow the float grammar. Values outside the decimal range
/// saturate and values below its precision round to the nearest one.
fn parse_amount_param(field: &str, value: &str) -> CoreResult<Decimal> {
    let invalid = || CoreError::validation(field, "Must be a number");

    if value.contains('_') {
        return Err(invalid());
    }
    let float = value.parse::<f64>().map_err(|_| invalid())?;
    if !float.is_finite() {
        return Err(invalid());
    }

    match Decimal::from_str(value).or_else(|_| Decimal::from_scientific(value)) {
        Ok(exact) => Ok(exact),
        Err(_) => Ok(approximate_amount(float)),
    }
}

fn approximate_amount(float: f64) -> Decimal {
    let limit = Decimal::MAX.to_f64().unwrap_or(f64::MAX);
    if float >= limit {
        Decimal::MAX
    } else if float <= -limit {
        Decimal::MIN
    } else if float.abs() < 1e-28 {
        Decimal::ZERO
    } else {
        Decimal::from_f64(float).unwrap_or(Decimal::ZERO)
    }
}

// ==================== Tests ====================
