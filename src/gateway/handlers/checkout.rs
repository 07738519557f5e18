//! Payment operation handlers

use std::sync::Arc;

use axum::{
    Json,
    extract::{FromRequest, Request, State},
};
use serde::de::DeserializeOwned;

use super::super::state::AppState;
use super::super::types::ApiResponse;
use crate::checkout::{
    CreateOrderPayload, CreateOrderResult, PurchasesResult, VerifyPaymentPayload,
    VerifyPaymentResult,
};
use crate::error::{PaymentError, PaymentErrorResponse};
use crate::user_auth::Caller;

/// JSON body extractor whose rejection is `INVALID_ARGUMENT`.
pub struct PaymentJson<T>(pub T);

impl<S, T> FromRequest<S> for PaymentJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = PaymentError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await.map_err(|e| {
            tracing::debug!("Rejected request body: {}", e);
            PaymentError::invalid_argument("Request body must be a valid JSON object")
        })?;
        Ok(PaymentJson(value))
    }
}

/// Create a payment order
///
/// POST /api/v1/createOrder
#[utoipa::path(
    post,
    path = "/api/v1/createOrder",
    request_body = CreateOrderPayload,
    responses(
        (status = 200, description = "Order created", body = ApiResponse<CreateOrderResult>),
        (status = 400, description = "Missing, non-numeric or non-positive amount", body = PaymentErrorResponse),
        (status = 500, description = "Gateway call failed", body = PaymentErrorResponse)
    ),
    tag = "Checkout"
)]
pub async fn create_order(
    State(state): State<Arc<AppState>>,
    PaymentJson(payload): PaymentJson<CreateOrderPayload>,
) -> Result<Json<ApiResponse<CreateOrderResult>>, PaymentError> {
    let amount = payload.amount()?;
    let result = state.checkout.create_order(amount).await?;
    Ok(Json(ApiResponse::success(result)))
}

/// Verify a completed payment and grant access
///
/// POST /api/v1/verifyPayment
#[utoipa::path(
    post,
    path = "/api/v1/verifyPayment",
    request_body = VerifyPaymentPayload,
    responses(
        (status = 200, description = "Payment verified, item granted", body = ApiResponse<VerifyPaymentResult>),
        (status = 400, description = "Missing field or signature mismatch", body = PaymentErrorResponse),
        (status = 401, description = "No caller identity", body = PaymentErrorResponse),
        (status = 500, description = "Persistence failed", body = PaymentErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Checkout"
)]
pub async fn verify_payment(
    State(state): State<Arc<AppState>>,
    Caller(caller): Caller,
    body: Result<PaymentJson<VerifyPaymentPayload>, PaymentError>,
) -> Result<Json<ApiResponse<VerifyPaymentResult>>, PaymentError> {
    // Identity is checked before the body is looked at
    let caller = caller.ok_or(PaymentError::Unauthenticated)?;
    let PaymentJson(payload) = body?;

    let result = state.checkout.verify_payment(Some(&caller), payload).await?;
    Ok(Json(ApiResponse::success(result)))
}

/// List the caller's purchased items
///
/// GET /api/v1/purchases
#[utoipa::path(
    get,
    path = "/api/v1/purchases",
    responses(
        (status = 200, description = "Purchased items", body = ApiResponse<PurchasesResult>),
        (status = 401, description = "No caller identity", body = PaymentErrorResponse),
        (status = 500, description = "Store unavailable", body = PaymentErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Checkout"
)]
pub async fn list_purchases(
    State(state): State<Arc<AppState>>,
    Caller(caller): Caller,
) -> Result<Json<ApiResponse<PurchasesResult>>, PaymentError> {
    let result = state.checkout.purchases(caller.as_ref()).await?;
    Ok(Json(ApiResponse::success(result)))
}
