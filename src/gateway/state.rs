use std::sync::Arc;

use crate::checkout::CheckoutService;
use crate::user_auth::IdentityVerifier;

/// Gateway shared state
///
/// Read-only after start-up: configuration, clients and the store handle.
#[derive(Clone)]
pub struct AppState {
    /// Order creation / payment verification
    pub checkout: Arc<CheckoutService>,
    /// Bearer token verification
    pub identity: Arc<IdentityVerifier>,
}

impl AppState {
    pub fn new(checkout: Arc<CheckoutService>, identity: Arc<IdentityVerifier>) -> Self {
        Self { checkout, identity }
    }
}
