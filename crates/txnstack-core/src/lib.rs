//! Core transaction processing and business logic
//!
//! - [`TransactionStore`]: records loaded once at startup
//! - [`TransactionFilters`]: filter sets and their evaluation
//! - [`TransactionService`]: gate-aware queries over the store

pub mod error;
pub mod filter;
pub mod models;
pub mod service;
pub mod store;
pub mod time;
pub mod types;

pub use error::{CoreError, CoreResult, ErrorCode, ErrorSeverity};
pub use filter::TransactionFilters;
pub use models::{RequestContext, Transaction};
pub use service::TransactionService;
pub use store::TransactionStore;
pub use types::{TransactionStatus, TransactionType};
