use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

/// JWT Claims structure
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String, // Subject (opaque user id from the identity provider)
    pub exp: usize,  // Expiration time (as UTC timestamp)
    #[serde(default)]
    pub iat: usize, // Issued at
}

/// Authenticated caller, injected into request extensions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallerIdentity {
    pub uid: String,
}

/// Verifies bearer tokens issued by the identity provider.
pub struct IdentityVerifier {
    secret: SecretString,
}

impl IdentityVerifier {
    pub fn new(secret: SecretString) -> Self {
        Self { secret }
    }

    /// Verify JWT token
    pub fn verify_token(&self, token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
        let decoding_key = DecodingKey::from_secret(self.secret.expose_secret().as_bytes());
        let validation = Validation::new(Algorithm::HS256);
        let token_data = decode::<Claims>(token, &decoding_key, &validation)?;
        Ok(token_data.claims)
    }

    /// Verify and map to a caller identity. Empty subjects are rejected.
    pub fn identify(&self, token: &str) -> Option<CallerIdentity> {
        match self.verify_token(token) {
            Ok(claims) if !claims.sub.is_empty() => Some(CallerIdentity { uid: claims.sub }),
            Ok(_) => None,
            Err(e) => {
                tracing::debug!("Bearer token rejected: {}", e);
                None
            }
        }
    }
}

#[cfg(test)]
pub(crate) fn issue_test_token(secret: &str, sub: &str, ttl_secs: i64) -> String {
    use jsonwebtoken::{EncodingKey, Header, encode};

    let now = chrono::Utc::now().timestamp();
    let claims = Claims {
        sub: sub.to_string(),
        exp: (now + ttl_secs) as usize,
        iat: now as usize,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .unwrap()
}
