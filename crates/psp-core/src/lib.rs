//! # psp-core
//!
//! Vendor-neutral payment service provider abstraction.
//!
//! This crate provides:
//! - `PaymentProvider` trait: the capability contract every provider module
//!   implements (redirect-to-pay, capture, cancel, and the extended
//!   authorize/subscribe/renew/refund lifecycle)
//! - `ProviderWrapper`: validating decorator guarding the trust boundary
//! - `ProviderRegistry`: explicit name → factory registration with
//!   one-instance-per-process semantics
//! - Signed callback payloads: the keyed-checksum channel a provider uses to
//!   report a payment outcome to the host without exposing it to forgery
//! - ISO 4217 currency code table and normalization
//! - `GatewayConfig`: the process-wide configuration context
//! - `PspError` for typed error handling
//!
//! ## Example
//!
//! ```rust,ignore
//! use psp_core::{GatewayConfig, PaymentProvider, PaymentRequest, ProviderRegistry};
//! use std::sync::Arc;
//!
//! let config = Arc::new(GatewayConfig::from_env()?);
//! let registry = ProviderRegistry::new(config)
//!     .with_provider("acme", |cfg| Ok(Box::new(AcmeModule::new(cfg)?) as _));
//!
//! // Charge USD 30.50
//! let provider = registry.get("acme")?;
//! let request = PaymentRequest::new("1041", 3050, "USD")
//!     .with_continue_url("https://shop.example.com/receipt")
//!     .with_callback_url("https://shop.example.com/psp-callback");
//!
//! // Emit the directive from your web layer, then stop handling the request
//! let directive = provider.redirect_to_payment_form(&request).await?;
//! ```

pub mod callback;
pub mod config;
pub mod currency;
pub mod error;
pub mod outcome;
pub mod provider;
pub mod registry;
pub mod wrapper;

// Re-exports for convenience
pub use callback::{seal, sign, verify, CallbackPayload, VerifiedCallback};
pub use config::GatewayConfig;
pub use currency::{currency_code_to_numeric, normalize, numeric_to_currency_code};
pub use error::PspError;
pub use outcome::{PaymentOutcome, ResultCode};
pub use provider::{
    BillingInterval, BoxedProvider, BrowserDirective, PaymentProvider, PaymentRequest,
    PayoutRequest, SubscriptionRequest,
};
pub use registry::{ProviderFactory, ProviderRegistry};
pub use wrapper::ProviderWrapper;
