use thiserror::Error;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("Failed to build HTTP client: {0}")]
    Client(String),

    #[error("HTTP request failed: {0}")]
    Transport(String),

    #[error("Gateway request timed out")]
    Timeout,

    #[error("Gateway returned {status}: {body}")]
    Upstream { status: u16, body: String },

    #[error("Failed to parse gateway response: {0}")]
    Parse(String),
}

impl From<reqwest::Error> for GatewayError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            GatewayError::Timeout
        } else if e.is_decode() {
            GatewayError::Parse(e.to_string())
        } else {
            GatewayError::Transport(e.to_string())
        }
    }
}
