//! # Gateway Facade
//!
//! Host- and provider-facing runtime: resolves providers through the
//! registry, delivers signed callbacks, verifies inbound callback data, and
//! exposes the generic outbound POST helper.

use crate::transport::Transport;
use psp_core::{
    callback, BrowserDirective, CallbackPayload, GatewayConfig, ProviderRegistry, ProviderWrapper,
    PspError, VerifiedCallback,
};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// Runtime mediating all communication between host, provider modules, and
/// the external payment services.
pub struct Gateway {
    config: Arc<GatewayConfig>,
    registry: ProviderRegistry,
    transport: Transport,
}

impl Gateway {
    pub fn new(registry: ProviderRegistry) -> Self {
        Self {
            config: registry.config().clone(),
            registry,
            transport: Transport::new(),
        }
    }

    pub fn config(&self) -> &Arc<GatewayConfig> {
        &self.config
    }

    pub fn registry(&self) -> &ProviderRegistry {
        &self.registry
    }

    /// Resolve a provider name to its wrapped module.
    ///
    /// The module is instantiated and configured at most once per process;
    /// the host only ever holds the validating wrapper.
    pub fn get_payment_provider(&self, name: &str) -> Result<Arc<ProviderWrapper>, PspError> {
        self.registry.get(name)
    }

    /// Deliver a signed payment notification to the host's callback URL.
    ///
    /// Used by provider modules once their gateway reports a completed
    /// payment. The payload currency is normalized and the checksum computed
    /// with the process secret before transmission. Returns the raw response
    /// body; delivery is attempted exactly once.
    #[instrument(skip(self, callback_url))]
    pub async fn invoke_callback(
        &self,
        callback_url: &str,
        transaction_id: &str,
        order_id: &str,
        amount: i64,
        currency: &str,
    ) -> Result<String, PspError> {
        let payload = callback::seal(
            &self.config.encryption_key,
            transaction_id,
            order_id,
            amount,
            currency,
        )?;

        info!(callback_url, "delivering signed payment callback");
        self.transport.post(callback_url, &payload).await
    }

    /// Verify and release the callback fields carried in an inbound
    /// form-encoded request body.
    ///
    /// The checksum is recomputed over the received fields; a mismatch is a
    /// [`PspError::Security`] and the data must not be used. On success the
    /// amount is coerced to an integer.
    pub fn verified_callback_data(&self, form_body: &str) -> Result<VerifiedCallback, PspError> {
        let payload = CallbackPayload::from_form(form_body)?;

        match callback::verify(&self.config.encryption_key, &payload) {
            Ok(verified) => Ok(verified),
            Err(e) => {
                if matches!(e, PspError::Security { .. }) {
                    warn!(
                        order_id = %payload.order_id,
                        "rejected callback with mismatching checksum"
                    );
                }
                Err(e)
            }
        }
    }

    /// Directive redirecting the user's browser to the continue URL passed
    /// to `redirect_to_payment_form`.
    ///
    /// The URL must not carry a query string; provider modules are not
    /// allowed to append parameters to host URLs. The hosting web layer
    /// emits the directive and ends the request.
    pub fn redirect_to_continue_url(&self, url: &str) -> Result<BrowserDirective, PspError> {
        if url.contains('?') {
            return Err(PspError::invalid_argument(
                "continue URL must not contain URL parameters",
            ));
        }

        Ok(BrowserDirective::Redirect {
            url: url.to_string(),
        })
    }

    /// Generic outbound form POST, available to provider modules for
    /// capture/cancel calls against their gateway APIs.
    pub async fn post<T: Serialize + ?Sized>(
        &self,
        url: &str,
        data: &T,
    ) -> Result<String, PspError> {
        self.transport.post(url, data).await
    }

    /// Path to the folder containing a provider's assets
    pub fn provider_path(&self, provider: &str) -> PathBuf {
        self.config.provider_path(provider)
    }

    /// External URL of the folder containing a provider's assets
    pub fn provider_url(&self, provider: &str) -> String {
        self.config.provider_url(provider)
    }

    /// Debug mail address, `None` when debugging is disabled.
    /// The mail transport itself is the host's collaborator.
    pub fn debug_mail(&self) -> Option<&str> {
        self.config.debug_mail()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gateway() -> Gateway {
        let config = Arc::new(
            GatewayConfig::new("test-secret").with_base_url("https://shop.example.com/libs/psp"),
        );
        Gateway::new(ProviderRegistry::new(config))
    }

    #[test]
    fn test_redirect_to_continue_url_rejects_query() {
        let gateway = gateway();
        let err = gateway
            .redirect_to_continue_url("https://shop.example.com/receipt?order=1041")
            .unwrap_err();
        assert!(matches!(err, PspError::InvalidArgument { .. }));
    }

    #[test]
    fn test_redirect_to_continue_url_passes_clean_url() {
        let gateway = gateway();
        let directive = gateway
            .redirect_to_continue_url("https://shop.example.com/receipt")
            .unwrap();
        assert_eq!(
            directive.location(),
            Some("https://shop.example.com/receipt")
        );
    }

    #[test]
    fn test_provider_locations() {
        let gateway = gateway();
        assert_eq!(
            gateway.provider_url("acme"),
            "https://shop.example.com/libs/psp/acme"
        );
        assert_eq!(gateway.provider_path("acme"), PathBuf::from("psp/acme"));
    }

    #[test]
    fn test_verified_callback_data_round_trip() {
        let gateway = gateway();
        let payload = callback::seal("test-secret", "TX-9", "1041", 3050, "USD").unwrap();
        let form = payload.to_form().unwrap();

        let verified = gateway.verified_callback_data(&form).unwrap();
        assert_eq!(verified.transaction_id, "TX-9");
        assert_eq!(verified.order_id, "1041");
        assert_eq!(verified.amount, 3050);
        assert_eq!(verified.currency, "USD");
    }

    #[test]
    fn test_verified_callback_data_rejects_tampering() {
        let gateway = gateway();
        let payload = callback::seal("test-secret", "TX-9", "1041", 3050, "USD").unwrap();
        let form = payload.to_form().unwrap().replace("Amount=3050", "Amount=9999");

        let err = gateway.verified_callback_data(&form).unwrap_err();
        assert!(matches!(err, PspError::Security { .. }));
    }

    #[test]
    fn test_verified_callback_data_rejects_missing_fields() {
        let gateway = gateway();
        let err = gateway
            .verified_callback_data("OrderId=1041&Amount=3050")
            .unwrap_err();
        assert!(matches!(err, PspError::InvalidArgument { .. }));
    }
}
