//! The two payment operations.
//!
//! - `createOrder`: amount -> gateway order id
//! - `verifyPayment`: signed gateway callback -> purchase grant

pub mod service;
pub mod types;

pub use service::CheckoutService;
pub use types::{
    CreateOrderPayload, CreateOrderResult, PurchasesResult, VerificationInput, VerifyPaymentPayload,
    VerifyPaymentResult,
};
