//! Route modules for the API server
//!
//! - transactions: transaction list and detail (JSON)
//! - health: liveness probe
//!
//! Each feature module keeps its handlers in `api.rs` and re-exports them
//! from `mod.rs`.

pub mod health;
pub mod transactions;
