use chrono::Utc;
use rust_decimal::Decimal;
use secrecy::SecretString;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};

use super::types::{
    CreateOrderResult, PurchasesResult, VerifyPaymentPayload, VerifyPaymentResult,
};
use crate::error::PaymentError;
use crate::money::Currency;
use crate::purchases::{PurchaseStore, StoreError};
use crate::razorpay::{CreateOrderRequest, OrderGateway};
use crate::signature::verify_payment_signature;
use crate::user_auth::CallerIdentity;

const ORDER_FAILED: &str = "Could not create order.";
const GRANT_FAILED: &str = "Could not update user profile.";
const READ_FAILED: &str = "Could not read user profile.";
const SIGNATURE_MISMATCH: &str = "Payment signature does not match.";
const ACCESS_GRANTED: &str = "Payment verified and access granted!";

/// Order creation and payment verification.
///
/// Stateless per call; holds only injected collaborators and settings.
pub struct CheckoutService {
    gateway: Arc<dyn OrderGateway>,
    store: Arc<dyn PurchaseStore>,
    key_secret: SecretString,
    currency: Currency,
    receipt_prefix: String,
    store_timeout: Duration,
}

impl CheckoutService {
    pub fn new(
        gateway: Arc<dyn OrderGateway>,
        store: Arc<dyn PurchaseStore>,
        key_secret: SecretString,
        currency: Currency,
        receipt_prefix: impl Into<String>,
        store_timeout: Duration,
    ) -> Self {
        Self {
            gateway,
            store,
            key_secret,
            currency,
            receipt_prefix: receipt_prefix.into(),
            store_timeout,
        }
    }

    /// Ping the purchase store, bounded by the store timeout.
    pub async fn store_health(&self) -> Result<(), StoreError> {
        self.with_timeout(self.store.health_check()).await
    }

    /// Build the gateway request for a major-unit amount.
    pub fn order_request(&self, amount: Decimal) -> Result<CreateOrderRequest, PaymentError> {
        let minor = self.currency.to_minor_units(amount)?;
        Ok(CreateOrderRequest {
            amount: minor,
            currency: self.currency.code.clone(),
            receipt: format!("{}{}", self.receipt_prefix, Utc::now().timestamp_millis()),
        })
    }

    /// Create a gateway order for `amount` major units.
    pub async fn create_order(&self, amount: Decimal) -> Result<CreateOrderResult, PaymentError> {
        let req = self.order_request(amount)?;

        match self.gateway.create_order(&req).await {
            Ok(order) => {
                info!(
                    "Order created: id={} amount={} currency={} receipt={}",
                    order.id, order.amount, order.currency, req.receipt
                );
                Ok(CreateOrderResult { order_id: order.id })
            }
            Err(e) => {
                error!(
                    "Error creating gateway order (amount={} receipt={}): {}",
                    req.amount, req.receipt, e
                );
                Err(PaymentError::Internal(ORDER_FAILED))
            }
        }
    }

    /// Verify a payment signature and grant `itemId` to the caller.
    ///
    /// `received -> signature-checked -> {rejected | persisted}`; nothing is
    /// written unless the signature matches.
    pub async fn verify_payment(
        &self,
        caller: Option<&CallerIdentity>,
        payload: VerifyPaymentPayload,
    ) -> Result<VerifyPaymentResult, PaymentError> {
        let caller = caller.ok_or(PaymentError::Unauthenticated)?;
        let input = payload.into_input()?;

        if !verify_payment_signature(
            &self.key_secret,
            &input.order_id,
            &input.payment_id,
            &input.signature,
        ) {
            warn!(
                "Signature mismatch: uid={} order_id={} payment_id={}",
                caller.uid, input.order_id, input.payment_id
            );
            return Err(PaymentError::invalid_argument(SIGNATURE_MISMATCH));
        }

        match self
            .with_timeout(self.store.grant(&caller.uid, &input.item_id))
            .await
        {
            Ok(()) => {
                info!(
                    "Payment verified: uid={} item_id={} order_id={} payment_id={}",
                    caller.uid, input.item_id, input.order_id, input.payment_id
                );
                Ok(VerifyPaymentResult {
                    message: ACCESS_GRANTED.to_string(),
                })
            }
            Err(e) => {
                error!(
                    "Error updating user document: uid={} item_id={} order_id={}: {}",
                    caller.uid, input.item_id, input.order_id, e
                );
                Err(PaymentError::Internal(GRANT_FAILED))
            }
        }
    }

    /// Purchased-items set of the caller.
    pub async fn purchases(
        &self,
        caller: Option<&CallerIdentity>,
    ) -> Result<PurchasesResult, PaymentError> {
        let caller = caller.ok_or(PaymentError::Unauthenticated)?;

        self.with_timeout(self.store.purchased_items(&caller.uid))
            .await
            .map(|items| PurchasesResult { items })
            .map_err(|e| {
                error!("Error reading purchases: uid={}: {}", caller.uid, e);
                PaymentError::Internal(READ_FAILED)
            })
    }

    async fn with_timeout<T, F>(&self, fut: F) -> Result<T, StoreError>
    where
        F: std::future::Future<Output = Result<T, StoreError>>,
    {
        match tokio::time::timeout(self.store_timeout, fut).await {
            Ok(res) => res,
            Err(_) => Err(StoreError::Timeout(self.store_timeout.as_millis() as u64)),
        }
    }
}
