//! class_pay gateway
//!
//! ```text
//! ┌──────────┐    ┌──────────┐    ┌───────────┐    ┌──────────┐
//! │  Client  │───▶│  Gateway │───▶│ Checkout  │───▶│ Razorpay │
//! │  (app)   │    │  (axum)  │    │ (service) │    │  Orders  │
//! └──────────┘    └──────────┘    └─────┬─────┘    └──────────┘
//!                                       │
//!                                       ▼
//!                                 ┌───────────┐
//!                                 │ Purchases │
//!                                 │ (users_tb)│
//!                                 └───────────┘
//! ```

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use secrecy::{ExposeSecret, SecretString};

use class_pay::config::{AppConfig, Secrets, StoreBackend};
use class_pay::gateway::{self, state::AppState};
use class_pay::{
    CheckoutService, IdentityVerifier, MemoryPurchaseStore, PgPurchaseStore, PurchaseStore,
    RazorpayClient,
};

fn get_env() -> String {
    let args: Vec<String> = std::env::args().collect();
    for i in 0..args.len() {
        if (args[i] == "--env" || args[i] == "-e") && i + 1 < args.len() {
            return args[i + 1].clone();
        }
    }
    "dev".to_string()
}

/// Get port override from command line (--port argument)
fn get_port_override() -> Option<u16> {
    let args: Vec<String> = std::env::args().collect();
    for i in 0..args.len() {
        if args[i] == "--port" && i + 1 < args.len() {
            return args[i + 1].parse().ok();
        }
    }
    None
}

async fn open_store(config: &AppConfig) -> anyhow::Result<Arc<dyn PurchaseStore>> {
    match config.store.backend {
        StoreBackend::Postgres => {
            let url = config
                .store
                .postgres_url
                .as_deref()
                .context("store.postgres_url is not set")?;
            let store = PgPurchaseStore::connect(url)
                .await
                .context("Failed to connect to PostgreSQL")?;
            store
                .init_schema()
                .await
                .context("Failed to initialize users_tb schema")?;
            Ok(Arc::new(store))
        }
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory purchase store; grants are lost on restart");
            Ok(Arc::new(MemoryPurchaseStore::new()))
        }
    }
}

async fn run(config: AppConfig, secrets: Secrets) -> anyhow::Result<()> {
    let payment = &config.payment;

    // Same secret authenticates order creation and signs payment callbacks
    let api_secret = SecretString::from(secrets.key_secret.expose_secret().to_owned());
    let gateway_client = RazorpayClient::new(
        payment.api_base_url.clone(),
        secrets.key_id,
        api_secret,
        Duration::from_millis(payment.request_timeout_ms),
    )
    .context("Failed to build payment gateway client")?;

    let store = open_store(&config).await?;

    let checkout = CheckoutService::new(
        Arc::new(gateway_client),
        store,
        secrets.key_secret,
        payment.currency.clone(),
        payment.receipt_prefix.clone(),
        Duration::from_millis(config.store.timeout_ms),
    );
    let identity = IdentityVerifier::new(secrets.auth_secret);

    let state = Arc::new(AppState::new(Arc::new(checkout), Arc::new(identity)));

    let port = get_port_override().unwrap_or(config.gateway.port);
    gateway::run_server(&config.gateway.host, port, state)
        .await
        .context("Gateway server error")
}

fn main() {
    let env = get_env();

    let app_config = match AppConfig::load(&env) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("FATAL: {}", e);
            std::process::exit(1);
        }
    };

    // Refuse to start without credentials rather than failing per request
    let secrets = match Secrets::from_env() {
        Ok(s) => s,
        Err(e) => {
            eprintln!("FATAL: {}", e);
            std::process::exit(1);
        }
    };

    let _log_guard = class_pay::logging::init_logging(&app_config);
    tracing::info!(
        "Starting class_pay in {} mode (gateway key {}, currency {})",
        env,
        secrets.key_id,
        app_config.payment.currency.code
    );

    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("FATAL: Failed to start tokio runtime: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = rt.block_on(run(app_config, secrets)) {
        tracing::error!("{:#}", e);
        eprintln!("FATAL: {:#}", e);
        std::process::exit(1);
    }
}
