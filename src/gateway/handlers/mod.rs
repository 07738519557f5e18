//! HTTP handlers
//!
//! - `checkout`: createOrder / verifyPayment / purchases
//! - `health`: liveness + store probe

pub mod checkout;
pub mod health;

// Glob re-exports carry the utoipa `__path_*` types for `ApiDoc`
pub use checkout::*;
pub use health::*;
