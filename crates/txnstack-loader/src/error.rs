//! Error types for txnstack-loader

use thiserror::Error;
use std::io;

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("Malformed transaction data in {location}: {message}")]
    Syntax {
        location: String,
        message: String,
    },
}
