use resolution_clients::ClientError;
use thiserror::Error;

/// Errors raised while wiring the gateway.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("failed to set up backend clients: {0}")]
    Client(#[from] ClientError),
    #[error("invalid public scheme '{0}'")]
    InvalidScheme(String),
}
