//! Error types for cardpay-core
//!
//! Every error carries a machine-readable code, a severity, and can be
//! expanded into serializable details with suggestions for the operator.
//! None of them is fatal: data shape problems are recovered at render time,
//! fetch and mutation failures become a display-level error state.

use thiserror::Error;
use serde::{Deserialize, Serialize};
use std::io;

/// Error codes for programmatic error handling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// No successful fetch has populated the page yet
    NotLoaded,
    /// Transaction not found
    TransactionNotFound,
    /// Commission already settled
    AlreadyPaid,
    /// Record is missing a field the view needs
    DataShape,
    /// Fetch collaborator failed
    FetchFailed,
    /// Mark-paid collaborator failed
    MutationFailed,
    /// Invalid data format
    InvalidFormat,
    /// IO error
    IoError,
    /// Operator may not perform the action
    Unauthorized,
    /// Internal error
    InternalError,
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorCode::NotLoaded => write!(f, "NOT_LOADED"),
            ErrorCode::TransactionNotFound => write!(f, "TRANSACTION_NOT_FOUND"),
            ErrorCode::AlreadyPaid => write!(f, "ALREADY_PAID"),
            ErrorCode::DataShape => write!(f, "DATA_SHAPE"),
            ErrorCode::FetchFailed => write!(f, "FETCH_FAILED"),
            ErrorCode::MutationFailed => write!(f, "MUTATION_FAILED"),
            ErrorCode::InvalidFormat => write!(f, "INVALID_FORMAT"),
            ErrorCode::IoError => write!(f, "IO_ERROR"),
            ErrorCode::Unauthorized => write!(f, "UNAUTHORIZED"),
            ErrorCode::InternalError => write!(f, "INTERNAL_ERROR"),
        }
    }
}

/// Detailed error information for API responses
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetails {
    /// Error code
    pub code: ErrorCode,
    /// Human-readable message
    pub message: String,
    /// Additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
    /// Suggestions for resolution
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub suggestions: Vec<String>,
}

impl ErrorDetails {
    /// Create a new error detail
    pub fn new(code: ErrorCode, message: String) -> Self {
        Self {
            code,
            message,
            details: None,
            suggestions: vec![],
        }
    }

    /// Add detail information
    pub fn with_detail(mut self, detail: serde_json::Value) -> Self {
        self.details = Some(detail);
        self
    }

    /// Add a suggestion
    pub fn with_suggestion(mut self, suggestion: String) -> Self {
        self.suggestions.push(suggestion);
        self
    }
}

impl std::fmt::Display for ErrorDetails {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)?;
        if let Some(ref details) = self.details {
            write!(f, "\nDetails: {}", details)?;
        }
        if !self.suggestions.is_empty() {
            write!(f, "\nSuggestions:")?;
            for suggestion in &self.suggestions {
                write!(f, "\n  - {}", suggestion)?;
            }
        }
        Ok(())
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorSeverity {
    /// Informational
    Info,
    /// Warning - operation may be affected
    Warning,
    /// Error - operation failed
    Error,
    /// Critical - application may be unstable
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

/// Main error type for cardpay-core
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    #[error("Card purchases not loaded")]
    NotLoaded,

    #[error("Transaction not found: {id}")]
    TransactionNotFound { id: String },

    #[error("Commission already paid for transaction {id}")]
    AlreadyPaid { id: String },

    #[error("Transaction {id} has no value for {field}")]
    DataShape { id: String, field: String },

    #[error("Fetch failed: {message}")]
    FetchFailed { message: String },

    #[error("Marking as paid failed: {message}")]
    MutationFailed { message: String },

    #[error("Invalid format: {message}")]
    InvalidFormat { message: String },

    #[error("IO error occurred: {message}")]
    IoError { message: String },

    #[error("Unauthorized: {action} requires a superuser")]
    Unauthorized { action: String },

    #[error("Internal error: {message}")]
    InternalError { message: String },
}

impl CoreError {
    /// Get the error code
    pub fn code(&self) -> ErrorCode {
        match self {
            CoreError::NotLoaded => ErrorCode::NotLoaded,
            CoreError::TransactionNotFound { .. } => ErrorCode::TransactionNotFound,
            CoreError::AlreadyPaid { .. } => ErrorCode::AlreadyPaid,
            CoreError::DataShape { .. } => ErrorCode::DataShape,
            CoreError::FetchFailed { .. } => ErrorCode::FetchFailed,
            CoreError::MutationFailed { .. } => ErrorCode::MutationFailed,
            CoreError::InvalidFormat { .. } => ErrorCode::InvalidFormat,
            CoreError::IoError { .. } => ErrorCode::IoError,
            CoreError::Unauthorized { .. } => ErrorCode::Unauthorized,
            CoreError::InternalError { .. } => ErrorCode::InternalError,
        }
    }

    /// Get the severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            CoreError::NotLoaded => ErrorSeverity::Info,
            CoreError::TransactionNotFound { .. } => ErrorSeverity::Info,
            CoreError::AlreadyPaid { .. } => ErrorSeverity::Info,
            CoreError::DataShape { .. } => ErrorSeverity::Warning,
            CoreError::FetchFailed { .. } => ErrorSeverity::Error,
            CoreError::MutationFailed { .. } => ErrorSeverity::Error,
            CoreError::InvalidFormat { .. } => ErrorSeverity::Error,
            CoreError::IoError { .. } => ErrorSeverity::Error,
            CoreError::Unauthorized { .. } => ErrorSeverity::Warning,
            CoreError::InternalError { .. } => ErrorSeverity::Critical,
        }
    }

    /// Convert to detailed error info
    pub fn to_details(&self) -> ErrorDetails {
        let mut details = ErrorDetails::new(self.code(), self.to_string());

        match self {
            CoreError::NotLoaded => {
                details = details.with_suggestion(
                    "Wait for the first fetch to finish or use /api/reload.".to_string(),
                );
            }
            CoreError::TransactionNotFound { .. } => {
                details = details.with_suggestion(
                    "The record may have been filtered out by a newer fetch; reload the list."
                        .to_string(),
                );
            }
            CoreError::DataShape { id, field } => {
                details = details.with_detail(serde_json::json!({ "transaction": id, "field": field }));
                details = details.with_suggestion(
                    "Check the backend response for this transaction.".to_string(),
                );
            }
            CoreError::FetchFailed { message } => {
                details = details.with_detail(serde_json::json!({ "fetch_message": message }));
                details = details.with_suggestion(
                    "Check that the backend base_url in the config is reachable.".to_string(),
                );
            }
            CoreError::MutationFailed { message } => {
                details = details.with_detail(serde_json::json!({ "mutation_message": message }));
            }
            CoreError::Unauthorized { .. } => {
                details = details.with_suggestion(
                    "Sign in with a superuser account to settle commissions.".to_string(),
                );
            }
            _ => {}
        }

        details
    }
}

/// Result type with CoreError
pub type CoreResult<T> = Result<T, CoreError>;

impl From<io::Error> for CoreError {
    fn from(error: io::Error) -> Self {
        CoreError::IoError {
            message: error.to_string(),
        }
    }
}

impl From<serde_json::Error> for CoreError {
    fn from(error: serde_json::Error) -> Self {
        CoreError::InvalidFormat {
            message: error.to_string(),
        }
    }
}

/// Error context for reporting
#[derive(Debug, Clone, Default)]
pub struct ErrorContext {
    /// Operator the page belongs to
    pub username: Option<String>,
    /// Operation being performed
    pub operation: String,
    /// Additional context data
    pub data: serde_json::Value,
}

impl ErrorContext {
    /// Create a new error context
    pub fn new(operation: &str) -> Self {
        Self {
            username: None,
            operation: operation.to_string(),
            data: serde_json::json!({}),
        }
    }

    /// Add the operator name
    pub fn with_username(mut self, username: &str) -> Self {
        self.username = Some(username.to_string());
        self
    }

    /// Add context data
    pub fn with_data(mut self, key: &str, value: serde_json::Value) -> Self {
        self.data[key] = value;
        self
    }
}

/// Error logger trait
pub trait ErrorLogger {
    /// Log an error
    fn log_error(&self, error: &CoreError, context: &ErrorContext);
}

/// Default error logger using log crate
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultErrorLogger;

impl ErrorLogger for DefaultErrorLogger {
    fn log_error(&self, error: &CoreError, context: &ErrorContext) {
        match error.severity() {
            ErrorSeverity::Info => log::info!(
                target: "cardpay::error",
                "[{}] {} - Operation: {} - User: {:?}",
                error.code(),
                error,
                context.operation,
                context.username
            ),
            ErrorSeverity::Warning => log::warn!(
                target: "cardpay::error",
                "[{}] {} - Operation: {} - User: {:?} - {}",
                error.code(),
                error,
                context.operation,
                context.username,
                context.data
            ),
            ErrorSeverity::Error | ErrorSeverity::Critical => log::error!(
                target: "cardpay::error",
                "ERROR {} - Operation: {} - User: {:?}",
                error.to_details(),
                context.operation,
                context.username
            ),
        }
    }
}

// ==================== Tests ====================
