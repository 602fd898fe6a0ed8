//! # psp-runtime
//!
//! Runtime layer for psp-gateway-rs.
//!
//! This crate provides:
//! - `Gateway`: the facade hosts and provider modules talk through
//! - `Transport`: outbound form-encoded POST with no built-in retry
//!
//! ## Flow
//!
//! | Step | Caller | Operation |
//! |------|--------|-----------|
//! | 1 | Host | `get_payment_provider(name)` → wrapped module |
//! | 2 | Host | `redirect_to_payment_form(request)` → browser directive |
//! | 3 | Provider module | `invoke_callback(..)` → signed POST to host |
//! | 4 | Host | `verified_callback_data(body)` → checked payload |
//! | 5 | Host | `capture_payment` / `cancel_payment` |

pub mod gateway;
pub mod transport;

pub use gateway::Gateway;
pub use transport::Transport;
