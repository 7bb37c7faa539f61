//! Error types for the client engine

use thiserror::Error;

/// Construction failures of the transport.
///
/// These never escape `connect()`: they are logged and leave the transport
/// `disconnected`.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Origin or path does not form a valid URL
    #[error("Invalid endpoint URL: {0}")]
    InvalidEndpoint(#[from] url::ParseError),

    /// Origin scheme has no websocket counterpart
    #[error("Unsupported origin scheme: {0}")]
    UnsupportedScheme(String),
}

/// Invalid client configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A variable is set but cannot be parsed
    #[error("Invalid value for {name}: {value:?} ({reason})")]
    InvalidValue {
        name: &'static str,
        value: String,
        reason: String,
    },
}

impl ConfigError {
    pub fn invalid(name: &'static str, value: impl Into<String>, reason: impl ToString) -> Self {
        Self::InvalidValue {
            name,
            value: value.into(),
            reason: reason.to_string(),
        }
    }
}
