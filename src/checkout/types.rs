use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::PaymentError;
use crate::money;

/// `createOrder` payload.
///
/// `amount` is kept as raw JSON so that strings, booleans and nulls are
/// reported as `INVALID_ARGUMENT` instead of a framework rejection.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct CreateOrderPayload {
    /// Purchase amount in major currency units
    #[schema(value_type = f64, example = 499)]
    #[serde(default)]
    pub amount: Option<serde_json::Value>,
}

impl CreateOrderPayload {
    /// Amount in major units. Sign and range are checked by the currency.
    pub fn amount(&self) -> Result<Decimal, PaymentError> {
        match &self.amount {
            None | Some(serde_json::Value::Null) => Err(PaymentError::invalid_argument(
                "Missing required field: amount",
            )),
            Some(serde_json::Value::Number(n)) => money::parse_amount(n),
            Some(_) => Err(PaymentError::invalid_argument("Amount must be a number")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderResult {
    #[schema(example = "order_EKwxwAgItmmXdp")]
    pub order_id: String,
}

/// `verifyPayment` payload. Every field is required; they are optional here
/// only so that absence is reported with the field name.
#[derive(Debug, Default, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VerifyPaymentPayload {
    #[schema(example = "order_EKwxwAgItmmXdp")]
    pub order_id: Option<String>,
    #[schema(example = "pay_29QQoUBi66xm2f")]
    pub payment_id: Option<String>,
    #[schema(example = "9ef4dffbfd84f1318f6739a3ce19f9d85851857ae648f114332d8401e0949a3d")]
    pub signature: Option<String>,
    /// Digital good being purchased; `classId` is accepted as an alias
    #[serde(alias = "classId")]
    #[schema(example = "class_rust_101")]
    pub item_id: Option<String>,
}

/// Verification input after presence checks. Still untrusted: the
/// signature has not been checked yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationInput {
    pub order_id: String,
    pub payment_id: String,
    pub signature: String,
    pub item_id: String,
}

fn required(value: Option<String>, field: &str) -> Result<String, PaymentError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(PaymentError::invalid_argument(format!(
            "Missing required field: {}",
            field
        ))),
    }
}

impl VerifyPaymentPayload {
    pub fn into_input(self) -> Result<VerificationInput, PaymentError> {
        Ok(VerificationInput {
            order_id: required(self.order_id, "orderId")?,
            payment_id: required(self.payment_id, "paymentId")?,
            signature: required(self.signature, "signature")?,
            item_id: required(self.item_id, "itemId")?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct VerifyPaymentResult {
    #[schema(example = "Payment verified and access granted!")]
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct PurchasesResult {
    #[schema(example = json!(["class_rust_101"]))]
    pub items: Vec<String>,
}
