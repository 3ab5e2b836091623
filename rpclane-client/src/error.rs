use rpclane_core::{EnvelopeError, ErrorObject};
use rpclane_transport::TransportError;
use thiserror::Error;

/// Every way a call can fail to produce a value.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The client is not configured well enough to issue the call.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The request never produced a response.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The server answered with an `error` envelope.
    #[error(transparent)]
    Application(ErrorObject),

    /// `cancel()` was called before the response arrived.
    #[error("call was cancelled")]
    Cancelled,

    #[error("failed to encode params: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("failed to decode result: {0}")]
    Decode(#[source] serde_json::Error),

    #[error("malformed response envelope: {0}")]
    Envelope(#[from] EnvelopeError),
}

impl ClientError {
    /// The server's error object, when the failure came from the application.
    pub fn application(&self) -> Option<&ErrorObject> {
        match self {
            ClientError::Application(err) => Some(err),
            _ => None,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, ClientError::Cancelled)
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {var}: {value:?} is not a number of milliseconds")]
    InvalidTimeout { var: &'static str, value: String },
}
