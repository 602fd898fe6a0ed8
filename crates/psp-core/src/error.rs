//! # Gateway Error Types
//!
//! Typed error handling for the payment gateway.
//! Fallible operations return `Result<T, PspError>`.
//!
//! A declined payment is not an error: provider modules report business
//! outcomes through [`crate::outcome::PaymentOutcome`] or a boolean return.
//! The error channel is reserved for operations that could not be attempted
//! or whose inputs could not be trusted.

use thiserror::Error;

/// Core error type for all gateway operations
#[derive(Debug, Error)]
pub enum PspError {
    /// Malformed or forbidden input (query delimiter in a URL, empty
    /// order id, negative amount)
    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },

    /// Integrity check failed on inbound callback data.
    /// Signals possible payment fraud and must never be downgraded.
    #[error("Security violation: {message}")]
    Security { message: String },

    /// Unknown provider name or unknown currency code
    #[error("Not found: {what}")]
    NotFound { what: String },

    /// Provider factory failed to produce a working module
    #[error("Failed to load provider '{provider}': {message}")]
    Load { provider: String, message: String },

    /// Outbound POST could not be completed
    #[error("Transport error: {message}")]
    Transport { message: String },

    /// Missing or invalid configuration
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Operation not implemented by this provider module
    #[error("Provider '{provider}' does not support {operation}")]
    Unsupported {
        provider: String,
        operation: &'static str,
    },
}

impl PspError {
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        PspError::InvalidArgument {
            message: message.into(),
        }
    }

    pub fn security(message: impl Into<String>) -> Self {
        PspError::Security {
            message: message.into(),
        }
    }

    pub fn not_found(what: impl Into<String>) -> Self {
        PspError::NotFound { what: what.into() }
    }

    pub fn transport(message: impl Into<String>) -> Self {
        PspError::Transport {
            message: message.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        PspError::Configuration {
            message: message.into(),
        }
    }

    /// Returns true if retrying the operation could succeed.
    /// The gateway itself never retries; this is a hint for callers.
    pub fn is_retryable(&self) -> bool {
        matches!(self, PspError::Transport { .. })
    }

    /// Returns the HTTP status code appropriate for this error
    pub fn status_code(&self) -> u16 {
        match self {
            PspError::InvalidArgument { .. } => 400,
            PspError::Security { .. } => 401,
            PspError::NotFound { .. } => 404,
            PspError::Load { .. } => 500,
            PspError::Transport { .. } => 503,
            PspError::Configuration { .. } => 500,
            PspError::Unsupported { .. } => 501,
        }
    }
}
