//! Payment gateway integration (Razorpay Orders API).
//!
//! ## Components
//! - `client`: `OrderGateway` trait and the HTTP client behind it
//! - `models`: Order request/response payloads
//! - `error`: Gateway failure kinds (logged, never returned to callers)

pub mod client;
pub mod error;
pub mod models;

pub use client::{OrderGateway, RazorpayClient};
pub use error::GatewayError;
pub use models::{CreateOrderRequest, Order};
