//! Error types for txnstack-core
//!
//! Every failure the core can report carries an [`ErrorCode`] for
//! programmatic handling and an [`ErrorSeverity`] that callers use to
//! pick a log level.

use thiserror::Error;
use txnstack_loader::LoadError;

/// Error codes for programmatic error handling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// Transaction not found
    TransactionNotFound,
    /// Malformed request parameter
    ValidationError,
    /// Malformed stored record
    InvalidFormat,
    /// Duplicate entry
    DuplicateEntry,
    /// Source data could not be read
    LoadError,
    /// Internal error
    InternalError,
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorCode::TransactionNotFound => write!(f, "TRANSACTION_NOT_FOUND"),
            ErrorCode::ValidationError => write!(f, "VALIDATION_ERROR"),
            ErrorCode::InvalidFormat => write!(f, "INVALID_FORMAT"),
            ErrorCode::DuplicateEntry => write!(f, "DUPLICATE_ENTRY"),
            ErrorCode::LoadError => write!(f, "LOAD_ERROR"),
            ErrorCode::InternalError => write!(f, "INTERNAL_ERROR"),
        }
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    /// Informational
    Info,
    /// Warning - request rejected, service healthy
    Warning,
    /// Error - operation failed
    Error,
    /// Critical - service cannot run
    Critical,
}

impl std::fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorSeverity::Info => write!(f, "info"),
            ErrorSeverity::Warning => write!(f, "warning"),
            ErrorSeverity::Error => write!(f, "error"),
            ErrorSeverity::Critical => write!(f, "critical"),
        }
    }
}

/// Main error type for txnstack-core
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Transaction not found: {id}")]
    TransactionNotFound { id: String },

    #[error("Invalid {field}: {message}")]
    ValidationError { field: String, message: String },

    #[error("Invalid format: {message}")]
    InvalidFormat { message: String },

    #[error("Duplicate entry: {entry}")]
    DuplicateEntry { entry: String },

    #[error("Failed to load transactions: {message}")]
    LoadError { message: String },

    #[error("Internal error: {message}")]
    InternalError { message: String },
}

impl CoreError {
    /// Get the error code
    pub fn code(&self) -> ErrorCode {
        match self {
            CoreError::TransactionNotFound { .. } => ErrorCode::TransactionNotFound,
            CoreError::ValidationError { .. } => ErrorCode::ValidationError,
            CoreError::InvalidFormat { .. } => ErrorCode::InvalidFormat,
            CoreError::DuplicateEntry { .. } => ErrorCode::DuplicateEntry,
            CoreError::LoadError { .. } => ErrorCode::LoadError,
            CoreError::InternalError { .. } => ErrorCode::InternalError,
        }
    }

    /// Get the severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            CoreError::TransactionNotFound { .. } => ErrorSeverity::Info,
            CoreError::ValidationError { .. } => ErrorSeverity::Warning,
            CoreError::InvalidFormat { .. } => ErrorSeverity::Critical,
            CoreError::DuplicateEntry { .. } => ErrorSeverity::Critical,
            CoreError::LoadError { .. } => ErrorSeverity::Critical,
            CoreError::InternalError { .. } => ErrorSeverity::Error,
        }
    }

    /// Whether the caller, not the service, is at fault
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            CoreError::TransactionNotFound { .. } | CoreError::ValidationError { .. }
        )
    }

    pub(crate) fn validation(field: &str, message: impl Into<String>) -> Self {
        CoreError::ValidationError {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

/// Result type with CoreError
pub type CoreResult<T> = Result<T, CoreError>;

impl From<LoadError> for CoreError {
    fn from(error: LoadError) -> Self {
        CoreError::LoadError {
            message: error.to_string(),
        }
    }
}

// ==================== Tests ====================
