//! Error types for txnstack-flags

use thiserror::Error;

#[derive(Error, Debug)]
pub enum FlagError {
    #[error("Flag provider request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Flag provider returned HTTP {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("Invalid flag provider response: {message}")]
    InvalidResponse { message: String },

    #[error("Flag provider client could not be built: {message}")]
    Client { message: String },
}
