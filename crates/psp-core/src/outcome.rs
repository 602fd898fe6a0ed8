//! # Payment Outcomes
//!
//! Result types returned by provider transaction-lifecycle operations.
//!
//! Outcomes carry business results ("attempted and declined"); the error
//! channel in [`crate::error`] is reserved for operations that could not be
//! attempted at all.

use serde::{Deserialize, Serialize};

/// Provider result code.
///
/// `0` is success, `100..=199` connection/transport failures, `200..=299`
/// funds/business failures. Everything else is provider-specific. `-1`
/// means unknown/unset and is never the final value of a successful call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResultCode(pub i32);

impl ResultCode {
    pub const UNKNOWN: ResultCode = ResultCode(-1);
    pub const SUCCESS: ResultCode = ResultCode(0);

    pub fn is_success(&self) -> bool {
        self.0 == 0
    }

    pub fn is_connection_error(&self) -> bool {
        (100..=199).contains(&self.0)
    }

    pub fn is_funds_error(&self) -> bool {
        (200..=299).contains(&self.0)
    }
}

impl Default for ResultCode {
    fn default() -> Self {
        ResultCode::UNKNOWN
    }
}

impl std::fmt::Display for ResultCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Result of a transaction-lifecycle operation.
///
/// Constructed fresh per operation by the provider module and owned by the
/// caller after return; the gateway never retains it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentOutcome {
    /// Host-assigned order correlator
    pub order_id: String,

    /// Provider-assigned transaction ID.
    /// Empty means capture/cancel is not supported for this transaction.
    pub transaction_id: String,

    /// Provider result code
    pub result_code: ResultCode,

    /// Human-readable diagnostic, may be empty
    #[serde(default)]
    pub message: String,
}

impl PaymentOutcome {
    /// Successful outcome
    pub fn success(order_id: impl Into<String>, transaction_id: impl Into<String>) -> Self {
        Self {
            order_id: order_id.into(),
            transaction_id: transaction_id.into(),
            result_code: ResultCode::SUCCESS,
            message: String::new(),
        }
    }

    /// Declined or failed outcome with a provider result code
    pub fn failure(
        order_id: impl Into<String>,
        result_code: ResultCode,
        message: impl Into<String>,
    ) -> Self {
        Self {
            order_id: order_id.into(),
            transaction_id: String::new(),
            result_code,
            message: message.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.result_code.is_success()
    }

    /// True when the transaction supports further processing
    /// (capture/cancel/refund)
    pub fn supports_processing(&self) -> bool {
        !self.transaction_id.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_result_code_ranges() {
        assert!(ResultCode::SUCCESS.is_success());
        assert!(ResultCode(150).is_connection_error());
        assert!(ResultCode(204).is_funds_error());
        assert!(!ResultCode(300).is_funds_error());
        assert!(!ResultCode::UNKNOWN.is_success());
    }

    #[test]
    fn test_success_outcome_never_unknown() {
        let outcome = PaymentOutcome::success("1041", "TX-9");
        assert!(outcome.is_success());
        assert_ne!(outcome.result_code, ResultCode::UNKNOWN);
        assert!(outcome.supports_processing());
    }

    #[test]
    fn test_empty_transaction_id_sentinel() {
        let outcome = PaymentOutcome::failure("1041", ResultCode(201), "insufficient funds");
        assert!(!outcome.is_success());
        assert!(!outcome.supports_processing());
    }
}
