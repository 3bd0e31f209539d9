//! Remote feature flags for txnstack
//!
//! A [`FeatureGate`] is built once at startup and shared by reference.
//! Request handlers only ever see its synchronous accessors.

pub mod error;
pub mod gate;
pub mod provider;

pub use error::FlagError;
pub use gate::{FeatureGate, FlagValues, ADVANCED_FILTERS, FLAG_NAMESPACE};
pub use provider::{FlagProvider, FlagRegistration, HttpFlagProvider, ProviderRef};
