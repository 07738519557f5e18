use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use std::fs;
use thiserror::Error;

use crate::money::{Currency, MAX_MINOR_UNIT_EXPONENT};

/// Environment variable holding the gateway key identifier.
pub const ENV_KEY_ID: &str = "RAZORPAY_KEY_ID";
/// Environment variable holding the gateway key secret.
pub const ENV_KEY_SECRET: &str = "RAZORPAY_KEY_SECRET";
/// Environment variable holding the identity provider's token secret.
pub const ENV_AUTH_SECRET: &str = "AUTH_JWT_SECRET";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("Failed to parse config yaml: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("{0} environment variable must be set")]
    MissingSecret(&'static str),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AppConfig {
    pub log_level: String,
    pub log_dir: String,
    pub log_file: String,
    pub use_json: bool,
    pub rotation: String,
    pub gateway: GatewayConfig,
    #[serde(default)]
    pub payment: PaymentConfig,
    #[serde(default)]
    pub store: StoreConfig,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct GatewayConfig {
    pub host: String,
    pub port: u16,
}

/// Payment gateway settings (non-secret)
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct PaymentConfig {
    pub api_base_url: String,
    #[serde(default)]
    pub currency: Currency,
    pub receipt_prefix: String,
    pub request_timeout_ms: u64,
}

impl Default for PaymentConfig {
    fn default() -> Self {
        Self {
            api_base_url: "https://api.razorpay.com/v1".to_string(),
            currency: Currency::default(),
            receipt_prefix: "receipt_".to_string(),
            request_timeout_ms: 10_000,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    Postgres,
    Memory,
}

/// Purchase store settings
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct StoreConfig {
    pub backend: StoreBackend,
    #[serde(default)]
    pub postgres_url: Option<String>,
    pub timeout_ms: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::Memory,
            postgres_url: None,
            timeout_ms: 10_000,
        }
    }
}

impl AppConfig {
    pub fn load(env: &str) -> Result<Self, ConfigError> {
        let config_path = format!("config/{}.yaml", env);
        let content = fs::read_to_string(&config_path).map_err(|source| ConfigError::Read {
            path: config_path.clone(),
            source,
        })?;
        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        let config: AppConfig = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.payment.currency.code.len() != 3 {
            return Err(ConfigError::Invalid(format!(
                "currency code '{}' is not ISO 4217",
                self.payment.currency.code
            )));
        }
        if self.payment.currency.minor_unit_factor().is_none() {
            return Err(ConfigError::Invalid(format!(
                "minor_unit_exponent must be at most {}",
                MAX_MINOR_UNIT_EXPONENT
            )));
        }
        if self.store.backend == StoreBackend::Postgres && self.store.postgres_url.is_none() {
            return Err(ConfigError::Invalid(
                "store.postgres_url is required for the postgres backend".to_string(),
            ));
        }
        Ok(())
    }
}

/// Secrets supplied by the environment at start-up.
///
/// Never deserialized from the config file and never logged.
pub struct Secrets {
    pub key_id: String,
    pub key_secret: SecretString,
    pub auth_secret: SecretString,
}

impl std::fmt::Debug for Secrets {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Secrets")
            .field("key_id", &self.key_id)
            .finish_non_exhaustive()
    }
}

impl Secrets {
    /// Load from process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load through an arbitrary lookup. Empty values count as missing.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let require = |name: &'static str| {
            lookup(name)
                .filter(|v| !v.trim().is_empty())
                .ok_or(ConfigError::MissingSecret(name))
        };

        Ok(Self {
            key_id: require(ENV_KEY_ID)?,
            key_secret: SecretString::from(require(ENV_KEY_SECRET)?),
            auth_secret: SecretString::from(require(ENV_AUTH_SECRET)?),
        })
    }
}
