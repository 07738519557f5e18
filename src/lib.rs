//! class_pay - payment orders and verified purchase grants
//!
//! Two operations over HTTP:
//! - `createOrder`: create a gateway order for an amount, return its id
//! - `verifyPayment`: check the gateway's HMAC signature and add the item
//!   to the caller's purchased-items set
//!
//! # Modules
//!
//! - [`config`] - YAML settings + secrets from the environment
//! - [`logging`] - tracing subscriber setup
//! - [`error`] - client-facing error taxonomy
//! - [`money`] - major/minor currency unit conversion
//! - [`signature`] - HMAC-SHA256 payment signature verification
//! - [`razorpay`] - payment gateway client
//! - [`purchases`] - purchase store (Postgres / in-memory)
//! - [`user_auth`] - caller identity from bearer tokens
//! - [`checkout`] - the two operations
//! - [`gateway`] - axum router, handlers, OpenAPI

pub mod checkout;
pub mod config;
pub mod error;
pub mod gateway;
pub mod logging;
pub mod money;
pub mod purchases;
pub mod razorpay;
pub mod signature;
pub mod user_auth;

// Convenient re-exports at crate root
pub use checkout::CheckoutService;
pub use config::{AppConfig, Secrets};
pub use error::PaymentError;
pub use money::Currency;
pub use purchases::{MemoryPurchaseStore, PgPurchaseStore, PurchaseStore};
pub use razorpay::{OrderGateway, RazorpayClient};
pub use user_auth::{CallerIdentity, IdentityVerifier};
