//! OpenAPI / Swagger UI Documentation
//!
//! - Swagger UI: `http://localhost:8080/docs`
//! - OpenAPI JSON: `http://localhost:8080/api-docs/openapi.json`

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::checkout::{
    CreateOrderPayload, CreateOrderResult, PurchasesResult, VerifyPaymentPayload,
    VerifyPaymentResult,
};
use crate::error::PaymentErrorResponse;
use crate::gateway::handlers::HealthResponse;

/// Bearer token issued by the identity provider
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some(
                            "HS256 token from the identity provider; `sub` is the caller uid",
                        ))
                        .build(),
                ),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Class Pay API",
        version = "0.1.0",
        description = "Payment order creation and signature-verified purchase grants.",
        license(
            name = "MIT"
        )
    ),
    servers(
        (url = "http://localhost:8080", description = "Development"),
    ),
    paths(
        crate::gateway::handlers::health_check,
        crate::gateway::handlers::create_order,
        crate::gateway::handlers::verify_payment,
        crate::gateway::handlers::list_purchases,
    ),
    components(
        schemas(
            HealthResponse,
            CreateOrderPayload,
            CreateOrderResult,
            VerifyPaymentPayload,
            VerifyPaymentResult,
            PurchasesResult,
            PaymentErrorResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Checkout", description = "Order creation and payment verification"),
        (name = "System", description = "Health checks and system info")
    )
)]
pub struct ApiDoc;
