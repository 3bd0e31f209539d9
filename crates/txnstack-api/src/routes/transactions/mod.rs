//! Transaction routes - list with optional filters, single lookup
//!
//! Structure:
//! - api.rs: JSON API endpoints

pub mod api;

pub use api::{api_transaction_detail, api_transactions};
