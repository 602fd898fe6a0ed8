//! # Provider Contract
//!
//! Capability trait implemented by every payment provider module.
//!
//! ## Design Pattern
//!
//! One trait, many provider modules, selected at runtime through the
//! [`crate::registry::ProviderRegistry`]. The host never holds a raw module:
//! every instance is wrapped in a validating decorator
//! ([`crate::wrapper::ProviderWrapper`]) before it crosses the trust
//! boundary.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │                PaymentProvider (trait)               │
//! │  ├── redirect_to_payment_form()                      │
//! │  ├── capture_payment() / cancel_payment()            │
//! │  └── authorize/subscribe/renew/capture/cancel/       │
//! │      refund/payout (extended lifecycle)              │
//! └──────────────────────────────────────────────────────┘
//!             ▲                          ▲
//!    ┌────────┴────────┐        ┌────────┴────────┐
//!    │ ProviderWrapper │──owns──│  concrete PSPs  │
//!    │   (decorator)   │        │  (per gateway)  │
//!    └─────────────────┘        └─────────────────┘
//! ```

use crate::error::PspError;
use crate::outcome::PaymentOutcome;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Parameters for initiating a payment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentRequest {
    /// Host-assigned unique order ID
    pub order_id: String,

    /// Amount in the smallest currency unit (e.g. cents for USD)
    pub amount: i64,

    /// ISO 4217 currency, alphabetic (USD) or numeric (840)
    pub currency: String,

    /// Browser redirect target after completed payment, e.g. a receipt.
    /// Must not carry a query string.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub continue_url: Option<String>,

    /// Host endpoint notified asynchronously when the payment is carried
    /// through. Must not carry a query string.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub callback_url: Option<String>,
}

impl PaymentRequest {
    pub fn new(order_id: impl Into<String>, amount: i64, currency: impl Into<String>) -> Self {
        Self {
            order_id: order_id.into(),
            amount,
            currency: currency.into(),
            continue_url: None,
            callback_url: None,
        }
    }

    pub fn with_continue_url(mut self, url: impl Into<String>) -> Self {
        self.continue_url = Some(url.into());
        self
    }

    pub fn with_callback_url(mut self, url: impl Into<String>) -> Self {
        self.callback_url = Some(url.into());
        self
    }
}

/// Recurring billing interval for subscriptions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BillingInterval {
    Weekly,
    Monthly,
    Yearly,
}

impl Default for BillingInterval {
    fn default() -> Self {
        BillingInterval::Monthly
    }
}

/// Parameters for creating a subscription agreement
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubscriptionRequest {
    pub order_id: String,

    /// Amount charged per interval, smallest currency unit
    pub amount: i64,

    pub currency: String,

    #[serde(default)]
    pub interval: BillingInterval,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub continue_url: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub callback_url: Option<String>,
}

/// Parameters for a payout. The `details` map is intentionally open:
/// destination accounts, bank identifiers, and similar fields differ per
/// gateway.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PayoutRequest {
    pub amount: i64,
    pub currency: String,
    #[serde(default)]
    pub details: HashMap<String, String>,
}

/// Browser-facing response produced by `redirect_to_payment_form` and
/// `redirect_to_continue_url`.
///
/// The gateway never terminates the request itself; the hosting web layer
/// emits this directive and performs no further gateway logic afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BrowserDirective {
    /// Plain HTTP redirect (Location header)
    Redirect { url: String },

    /// Auto-submitting form POST to the external payment window
    AutoPostForm {
        action: String,
        fields: Vec<(String, String)>,
    },
}

impl BrowserDirective {
    /// Target of a plain redirect, if this directive is one
    pub fn location(&self) -> Option<&str> {
        match self {
            BrowserDirective::Redirect { url } => Some(url),
            BrowserDirective::AutoPostForm { .. } => None,
        }
    }

    /// Renders the directive as a self-contained HTML document.
    ///
    /// Form directives submit themselves shortly after load; redirects fall
    /// back to a meta refresh for web layers that choose not to emit a
    /// Location header.
    pub fn html(&self) -> String {
        match self {
            BrowserDirective::Redirect { url } => format!(
                "<!DOCTYPE html><html><head><meta http-equiv=\"refresh\" content=\"0;url={url}\"></head><body></body></html>",
                url = escape_html(url)
            ),
            BrowserDirective::AutoPostForm { action, fields } => {
                let mut inputs = String::new();
                for (name, value) in fields {
                    inputs.push_str(&format!(
                        "<input type=\"hidden\" name=\"{}\" value=\"{}\">\n",
                        escape_html(name),
                        escape_html(value)
                    ));
                }
                format!(
                    concat!(
                        "<!DOCTYPE html><html><body>\n",
                        "<form id=\"PaymentForm\" method=\"POST\" action=\"{action}\">\n",
                        "{inputs}",
                        "</form>\n",
                        "<script type=\"text/javascript\">\n",
                        "setTimeout(function() {{ document.getElementById(\"PaymentForm\").submit(); }}, 100);\n",
                        "</script>\n",
                        "</body></html>"
                    ),
                    action = escape_html(action),
                    inputs = inputs
                )
            }
        }
    }
}

fn escape_html(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Capability set implemented by every payment provider module.
///
/// `redirect_to_payment_form`, `capture_payment`, and `cancel_payment` form
/// the minimum contract. The extended lifecycle defaults to
/// [`PspError::Unsupported`] so modules opt in per operation.
#[async_trait]
pub trait PaymentProvider: Send + Sync {
    /// Provider name, also the registry key
    fn name(&self) -> &str;

    /// Initiate a payment and return the directive sending the user's
    /// browser to the external payment window.
    ///
    /// The provider associates the payment with `request.order_id`, charges
    /// `request.amount` in `request.currency`, and arranges for
    /// `continue_url` (browser) and `callback_url` (server-to-server) to be
    /// reached when the payment completes.
    async fn redirect_to_payment_form(
        &self,
        request: &PaymentRequest,
    ) -> Result<BrowserDirective, PspError>;

    /// Withdraw a previously authorized amount.
    /// Returns whether the provider reported success.
    async fn capture_payment(&self, transaction_id: &str, amount: i64)
        -> Result<bool, PspError>;

    /// Void a previously authorized, not yet captured, transaction.
    /// Returns whether the provider reported success.
    async fn cancel_payment(&self, transaction_id: &str) -> Result<bool, PspError>;

    // --- Extended lifecycle (optional per deployment) ---

    /// Settings the module expects, as key → description of the expected
    /// value. Used by hosts to render configuration forms.
    fn configuration_template(&self) -> HashMap<String, String> {
        HashMap::new()
    }

    /// Apply per-provider settings. Invoked once by the registry before the
    /// module is wrapped and shared.
    fn configure(&mut self, _settings: HashMap<String, String>) -> Result<(), PspError> {
        Ok(())
    }

    /// Link to the gateway's integration documentation
    fn documentation_link(&self) -> Option<&str> {
        None
    }

    async fn authorize(&self, _request: &PaymentRequest) -> Result<PaymentOutcome, PspError> {
        Err(self.unsupported("authorize"))
    }

    async fn subscribe(
        &self,
        _request: &SubscriptionRequest,
    ) -> Result<PaymentOutcome, PspError> {
        Err(self.unsupported("subscribe"))
    }

    async fn renew(&self, _transaction_id: &str) -> Result<PaymentOutcome, PspError> {
        Err(self.unsupported("renew"))
    }

    /// Capture with a partial amount, reporting a full outcome record
    async fn capture(
        &self,
        _transaction_id: &str,
        _amount: i64,
    ) -> Result<PaymentOutcome, PspError> {
        Err(self.unsupported("capture"))
    }

    async fn cancel(&self, _transaction_id: &str) -> Result<PaymentOutcome, PspError> {
        Err(self.unsupported("cancel"))
    }

    async fn refund(
        &self,
        _transaction_id: &str,
        _amount: i64,
    ) -> Result<PaymentOutcome, PspError> {
        Err(self.unsupported("refund"))
    }

    async fn payout(&self, _request: &PayoutRequest) -> Result<PaymentOutcome, PspError> {
        Err(self.unsupported("payout"))
    }

    #[doc(hidden)]
    fn unsupported(&self, operation: &'static str) -> PspError {
        PspError::Unsupported {
            provider: self.name().to_string(),
            operation,
        }
    }
}

/// Boxed provider module (dynamic dispatch)
pub type BoxedProvider = Box<dyn PaymentProvider>;

#[cfg(test)]
mod tests {
    use super::*;

    struct Minimal;

    #[async_trait]
    impl PaymentProvider for Minimal {
        fn name(&self) -> &str {
            "minimal"
        }

        async fn redirect_to_payment_form(
            &self,
            request: &PaymentRequest,
        ) -> Result<BrowserDirective, PspError> {
            Ok(BrowserDirective::Redirect {
                url: format!("https://pay.example.com/{}", request.order_id),
            })
        }

        async fn capture_payment(
            &self,
            _transaction_id: &str,
            _amount: i64,
        ) -> Result<bool, PspError> {
            Ok(true)
        }

        async fn cancel_payment(&self, _transaction_id: &str) -> Result<bool, PspError> {
            Ok(true)
        }
    }

    #[tokio::test]
    async fn test_extended_lifecycle_defaults_to_unsupported() {
        let provider = Minimal;
        let request = PaymentRequest::new("1041", 3050, "USD");

        let err = provider.authorize(&request).await.unwrap_err();
        assert!(matches!(
            err,
            PspError::Unsupported {
                operation: "authorize",
                ..
            }
        ));
        assert_eq!(err.status_code(), 501);
    }

    #[test]
    fn test_auto_post_form_html_escapes_values() {
        let directive = BrowserDirective::AutoPostForm {
            action: "https://pay.example.com/form".to_string(),
            fields: vec![("orderid".to_string(), "10\"41".to_string())],
        };

        let html = directive.html();
        assert!(html.contains("value=\"10&quot;41\""));
        assert!(html.contains("method=\"POST\""));
        assert!(html.contains("PaymentForm"));
    }

    #[test]
    fn test_redirect_location() {
        let directive = BrowserDirective::Redirect {
            url: "https://shop.example.com/receipt".to_string(),
        };
        assert_eq!(
            directive.location(),
            Some("https://shop.example.com/receipt")
        );
        assert!(directive.html().contains("http-equiv=\"refresh\""));
    }
}
