use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use std::fmt::Debug;
use std::time::Duration;
use tracing::debug;

use super::error::GatewayError;
use super::models::{CreateOrderRequest, Order};

/// Order creation on the payment gateway.
#[async_trait]
pub trait OrderGateway: Send + Sync + Debug {
    /// Create an order and return the gateway's order entity
    async fn create_order(&self, req: &CreateOrderRequest) -> Result<Order, GatewayError>;
}

/// Razorpay Orders API client.
///
/// Built once at start-up from injected credentials; holds a pooled
/// `reqwest::Client` with a bounded request timeout.
pub struct RazorpayClient {
    http: reqwest::Client,
    base_url: String,
    key_id: String,
    key_secret: SecretString,
}

impl Debug for RazorpayClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RazorpayClient")
            .field("base_url", &self.base_url)
            .field("key_id", &self.key_id)
            .finish_non_exhaustive()
    }
}

impl RazorpayClient {
    pub fn new(
        base_url: impl Into<String>,
        key_id: String,
        key_secret: SecretString,
        timeout: Duration,
    ) -> Result<Self, GatewayError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| GatewayError::Client(e.to_string()))?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            key_id,
            key_secret,
        })
    }

    fn orders_url(&self) -> String {
        format!("{}/orders", self.base_url)
    }
}

#[async_trait]
impl OrderGateway for RazorpayClient {
    async fn create_order(&self, req: &CreateOrderRequest) -> Result<Order, GatewayError> {
        debug!(
            "POST {} amount={} currency={} receipt={}",
            self.orders_url(),
            req.amount,
            req.currency,
            req.receipt
        );

        let response = self
            .http
            .post(self.orders_url())
            .basic_auth(&self.key_id, Some(self.key_secret.expose_secret()))
            .json(req)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GatewayError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        let order: Order = response.json().await?;
        Ok(order)
    }
}
