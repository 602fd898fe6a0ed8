//! # Provider Wrapper
//!
//! Validating decorator enforcing the provider contract at the trust
//! boundary between host, provider module, and browser.
//!
//! Every module instance is wrapped before the host sees it. The wrapper
//! checks arguments, then delegates verbatim; module-level failures
//! propagate untouched.

use crate::error::PspError;
use crate::outcome::PaymentOutcome;
use crate::provider::{
    BoxedProvider, BrowserDirective, PaymentProvider, PaymentRequest, PayoutRequest,
    SubscriptionRequest,
};
use async_trait::async_trait;
use std::collections::HashMap;
use tracing::debug;

/// Decorator implementing [`PaymentProvider`] over a wrapped module.
pub struct ProviderWrapper {
    module: BoxedProvider,
}

impl ProviderWrapper {
    pub fn new(module: BoxedProvider) -> Self {
        Self { module }
    }
}

impl std::fmt::Debug for ProviderWrapper {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderWrapper").finish_non_exhaustive()
    }
}

fn require_non_empty(value: &str, field: &str) -> Result<(), PspError> {
    if value.is_empty() {
        return Err(PspError::invalid_argument(format!(
            "{field} must be a non-empty string"
        )));
    }
    Ok(())
}

fn require_non_negative(amount: i64) -> Result<(), PspError> {
    if amount < 0 {
        return Err(PspError::invalid_argument(format!(
            "amount must be a non-negative integer, got {amount}"
        )));
    }
    Ok(())
}

/// Continue/callback URLs must not already carry a query string. A provider
/// module is never allowed to append query data to a host URL it does not
/// own.
fn require_no_query(url: Option<&str>, field: &str) -> Result<(), PspError> {
    if let Some(url) = url {
        if url.contains('?') {
            return Err(PspError::invalid_argument(format!(
                "{field} must not contain URL parameters"
            )));
        }
    }
    Ok(())
}

fn validate_payment_request(request: &PaymentRequest) -> Result<(), PspError> {
    require_non_empty(&request.order_id, "order_id")?;
    require_non_negative(request.amount)?;
    require_non_empty(&request.currency, "currency")?;
    require_no_query(request.continue_url.as_deref(), "continue_url")?;
    require_no_query(request.callback_url.as_deref(), "callback_url")?;
    Ok(())
}

#[async_trait]
impl PaymentProvider for ProviderWrapper {
    fn name(&self) -> &str {
        self.module.name()
    }

    async fn redirect_to_payment_form(
        &self,
        request: &PaymentRequest,
    ) -> Result<BrowserDirective, PspError> {
        validate_payment_request(request)?;

        debug!(
            provider = self.module.name(),
            order_id = %request.order_id,
            amount = request.amount,
            currency = %request.currency,
            "redirecting to payment form"
        );

        self.module.redirect_to_payment_form(request).await
    }

    async fn capture_payment(
        &self,
        transaction_id: &str,
        amount: i64,
    ) -> Result<bool, PspError> {
        require_non_negative(amount)?;
        self.module.capture_payment(transaction_id, amount).await
    }

    async fn cancel_payment(&self, transaction_id: &str) -> Result<bool, PspError> {
        self.module.cancel_payment(transaction_id).await
    }

    fn configuration_template(&self) -> HashMap<String, String> {
        self.module.configuration_template()
    }

    fn configure(&mut self, settings: HashMap<String, String>) -> Result<(), PspError> {
        self.module.configure(settings)
    }

    fn documentation_link(&self) -> Option<&str> {
        self.module.documentation_link()
    }

    async fn authorize(&self, request: &PaymentRequest) -> Result<PaymentOutcome, PspError> {
        validate_payment_request(request)?;
        self.module.authorize(request).await
    }

    async fn subscribe(
        &self,
        request: &SubscriptionRequest,
    ) -> Result<PaymentOutcome, PspError> {
        require_non_empty(&request.order_id, "order_id")?;
        require_non_negative(request.amount)?;
        require_non_empty(&request.currency, "currency")?;
        require_no_query(request.continue_url.as_deref(), "continue_url")?;
        require_no_query(request.callback_url.as_deref(), "callback_url")?;
        self.module.subscribe(request).await
    }

    async fn renew(&self, transaction_id: &str) -> Result<PaymentOutcome, PspError> {
        self.module.renew(transaction_id).await
    }

    async fn capture(
        &self,
        transaction_id: &str,
        amount: i64,
    ) -> Result<PaymentOutcome, PspError> {
        require_non_negative(amount)?;
        self.module.capture(transaction_id, amount).await
    }

    async fn cancel(&self, transaction_id: &str) -> Result<PaymentOutcome, PspError> {
        self.module.cancel(transaction_id).await
    }

    async fn refund(
        &self,
        transaction_id: &str,
        amount: i64,
    ) -> Result<PaymentOutcome, PspError> {
        require_non_negative(amount)?;
        self.module.refund(transaction_id, amount).await
    }

    async fn payout(&self, request: &PayoutRequest) -> Result<PaymentOutcome, PspError> {
        require_non_negative(request.amount)?;
        require_non_empty(&request.currency, "currency")?;
        self.module.payout(request).await
    }
}
