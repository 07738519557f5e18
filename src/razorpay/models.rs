use serde::{Deserialize, Serialize};

/// Body of `POST /orders`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreateOrderRequest {
    /// Minor currency units (paise for INR)
    pub amount: u64,
    pub currency: String,
    pub receipt: String,
}

/// Order entity returned by the gateway. Only the fields we read are
/// declared; the rest of the payload is ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct Order {
    pub id: String,
    pub amount: u64,
    pub currency: String,
    #[serde(default)]
    pub receipt: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}
