//! # Signed Callback Payloads
//!
//! The normalized, signed record a provider module sends to the host's
//! callback endpoint, and the signer/verifier guarding it.
//!
//! Wire format is `application/x-www-form-urlencoded` with the fields
//! `TransactionId`, `OrderId`, `Amount` (decimal string), `Currency`
//! (ISO 4217 alphabetic), and `Checksum` (hex digest). The checksum binds
//! the four data fields to the process-wide signing secret; a payload is
//! accepted only when the recomputed checksum matches exactly.
//!
//! The digest is MD5 over the secret-prefixed field concatenation, kept for
//! wire compatibility with existing deployments. Replacing it requires a
//! protocol version bump on both sides of the callback channel.

use crate::currency;
use crate::error::PspError;
use md5::{Digest, Md5};
use serde::{Deserialize, Serialize};

/// Signed callback record as carried on the wire.
///
/// `amount` stays a string here; it is coerced to an integer only after the
/// checksum has been verified.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CallbackPayload {
    /// Provider transaction ID; empty when capture/cancel is unsupported
    pub transaction_id: String,

    /// Host-assigned order ID
    pub order_id: String,

    /// Amount in smallest currency unit, canonical decimal string
    pub amount: String,

    /// ISO 4217 alphabetic currency code
    pub currency: String,

    /// Keyed integrity code over the four fields above
    pub checksum: String,
}

/// Callback fields released to the host after integrity verification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedCallback {
    pub transaction_id: String,
    pub order_id: String,
    pub amount: i64,
    pub currency: String,
}

/// Computes the integrity code over the callback fields.
///
/// Deterministic and order-sensitive: the digest runs over the exact
/// concatenation `secret ‖ transaction_id ‖ order_id ‖ amount ‖ currency`,
/// with the amount in canonical decimal form.
pub fn sign(
    secret: &str,
    transaction_id: &str,
    order_id: &str,
    amount: i64,
    currency: &str,
) -> String {
    let mut hasher = Md5::new();
    hasher.update(secret.as_bytes());
    hasher.update(transaction_id.as_bytes());
    hasher.update(order_id.as_bytes());
    hasher.update(amount.to_string().as_bytes());
    hasher.update(currency.as_bytes());
    hex::encode(hasher.finalize())
}

/// Builds a signed payload ready for transmission.
///
/// The currency is normalized to its alphabetic form first, so a provider
/// sending `"840"` and one sending `"USD"` produce identical payloads.
pub fn seal(
    secret: &str,
    transaction_id: &str,
    order_id: &str,
    amount: i64,
    currency: &str,
) -> Result<CallbackPayload, PspError> {
    if amount < 0 {
        return Err(PspError::invalid_argument(format!(
            "amount must be a non-negative integer, got {amount}"
        )));
    }

    let currency = currency::normalize(currency)?;
    let checksum = sign(secret, transaction_id, order_id, amount, &currency);

    Ok(CallbackPayload {
        transaction_id: transaction_id.to_string(),
        order_id: order_id.to_string(),
        amount: amount.to_string(),
        currency,
        checksum,
    })
}

/// Recomputes the checksum over a received payload and releases the data
/// only on an exact match.
///
/// Any mismatch is a [`PspError::Security`]: it signals tampering or a
/// forged notification, not a business failure.
pub fn verify(secret: &str, payload: &CallbackPayload) -> Result<VerifiedCallback, PspError> {
    let amount: i64 = payload.amount.trim().parse().map_err(|_| {
        PspError::invalid_argument(format!(
            "callback amount '{}' is not an integer",
            payload.amount
        ))
    })?;

    let expected = sign(
        secret,
        &payload.transaction_id,
        &payload.order_id,
        amount,
        &payload.currency,
    );

    if !constant_time_compare(&expected, &payload.checksum) {
        return Err(PspError::security(
            "integrity check failed - mismatching checksums",
        ));
    }

    Ok(VerifiedCallback {
        transaction_id: payload.transaction_id.clone(),
        order_id: payload.order_id.clone(),
        amount,
        currency: payload.currency.clone(),
    })
}

impl CallbackPayload {
    /// Encodes the payload as a form-urlencoded body
    pub fn to_form(&self) -> Result<String, PspError> {
        serde_urlencoded::to_string(self).map_err(|e| {
            PspError::invalid_argument(format!("failed to encode callback payload: {e}"))
        })
    }

    /// Decodes a form-urlencoded body. Any missing field is a rejection.
    pub fn from_form(body: &str) -> Result<Self, PspError> {
        serde_urlencoded::from_str(body).map_err(|e| {
            PspError::invalid_argument(format!("malformed callback payload: {e}"))
        })
    }
}

fn constant_time_compare(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.bytes()
        .zip(b.bytes())
        .fold(0, |acc, (x, y)| acc | (x ^ y))
        == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "-mjhf6/43kBSD&24*f.GL;4917fd@DMBv_IQ512";

    #[test]
    fn test_sign_is_deterministic() {
        let a = sign(SECRET, "TX-9", "1041", 3050, "USD");
        let b = sign(SECRET, "TX-9", "1041", 3050, "USD");
        assert_eq!(a, b);
        assert_eq!(a.len(), 32);
    }

    #[test]
    fn test_sign_is_value_sensitive() {
        let base = sign(SECRET, "TX-9", "1041", 3050, "USD");
        assert_ne!(base, sign(SECRET, "TX-9", "1041", 3050, "EUR"));
        assert_ne!(base, sign(SECRET, "TX-9", "1041", 3051, "USD"));
        assert_ne!(base, sign(SECRET, "TX-9", "1042", 3050, "USD"));
        assert_ne!(base, sign(SECRET, "TX-8", "1041", 3050, "USD"));
    }

    #[test]
    fn test_sign_is_order_sensitive() {
        // Swapping transaction and order ids must not collide
        assert_ne!(
            sign(SECRET, "1041", "TX-9", 3050, "USD"),
            sign(SECRET, "TX-9", "1041", 3050, "USD")
        );
    }

    #[test]
    fn test_secret_changes_every_signature() {
        assert_ne!(
            sign("key-a", "TX-9", "1041", 3050, "USD"),
            sign("key-b", "TX-9", "1041", 3050, "USD")
        );
    }

    #[test]
    fn test_seal_then_verify() {
        let payload = seal(SECRET, "TX-9", "1041", 3050, "USD").unwrap();
        let verified = verify(SECRET, &payload).unwrap();

        assert_eq!(verified.transaction_id, "TX-9");
        assert_eq!(verified.order_id, "1041");
        assert_eq!(verified.amount, 3050);
        assert_eq!(verified.currency, "USD");
    }

    #[test]
    fn test_numeric_currency_normalized_before_signing() {
        let numeric = seal(SECRET, "TX-9", "1041", 3050, "840").unwrap();
        let alphabetic = seal(SECRET, "TX-9", "1041", 3050, "USD").unwrap();

        assert_eq!(numeric.currency, "USD");
        assert_eq!(numeric.checksum, alphabetic.checksum);
    }

    #[test]
    fn test_verify_rejects_any_altered_field() {
        let payload = seal(SECRET, "TX-9", "1041", 3050, "USD").unwrap();

        let mut tampered = payload.clone();
        tampered.amount = "9999".to_string();
        assert!(matches!(
            verify(SECRET, &tampered),
            Err(PspError::Security { .. })
        ));

        let mut tampered = payload.clone();
        tampered.order_id = "1042".to_string();
        assert!(matches!(
            verify(SECRET, &tampered),
            Err(PspError::Security { .. })
        ));

        let mut tampered = payload.clone();
        tampered.transaction_id = "TX-10".to_string();
        assert!(matches!(
            verify(SECRET, &tampered),
            Err(PspError::Security { .. })
        ));

        let mut tampered = payload.clone();
        tampered.currency = "EUR".to_string();
        assert!(matches!(
            verify(SECRET, &tampered),
            Err(PspError::Security { .. })
        ));

        let mut tampered = payload;
        tampered.checksum = "0".repeat(32);
        assert!(matches!(
            verify(SECRET, &tampered),
            Err(PspError::Security { .. })
        ));
    }

    #[test]
    fn test_verify_with_wrong_secret_fails() {
        let payload = seal(SECRET, "TX-9", "1041", 3050, "USD").unwrap();
        assert!(matches!(
            verify("other-secret", &payload),
            Err(PspError::Security { .. })
        ));
    }

    #[test]
    fn test_seal_rejects_negative_amount() {
        assert!(matches!(
            seal(SECRET, "TX-9", "1041", -1, "USD"),
            Err(PspError::InvalidArgument { .. })
        ));
    }

    #[test]
    fn test_empty_transaction_id_is_valid() {
        // Empty string is the documented sentinel for "no further processing"
        let payload = seal(SECRET, "", "1041", 3050, "USD").unwrap();
        let verified = verify(SECRET, &payload).unwrap();
        assert_eq!(verified.transaction_id, "");
    }

    #[test]
    fn test_form_round_trip() {
        let payload = seal(SECRET, "TX-9", "1041", 3050, "USD").unwrap();
        let form = payload.to_form().unwrap();

        assert!(form.contains("TransactionId=TX-9"));
        assert!(form.contains("OrderId=1041"));
        assert!(form.contains("Amount=3050"));
        assert!(form.contains("Currency=USD"));
        assert!(form.contains("Checksum="));

        let decoded = CallbackPayload::from_form(&form).unwrap();
        assert_eq!(decoded, payload);
    }

    #[test]
    fn test_missing_field_rejected() {
        let err = CallbackPayload::from_form("OrderId=1041&Amount=3050&Currency=USD")
            .unwrap_err();
        assert!(matches!(err, PspError::InvalidArgument { .. }));
    }

    #[test]
    fn test_non_integer_amount_rejected() {
        let mut payload = seal(SECRET, "TX-9", "1041", 3050, "USD").unwrap();
        payload.amount = "30.50".to_string();
        assert!(matches!(
            verify(SECRET, &payload),
            Err(PspError::InvalidArgument { .. })
        ));
    }
}
