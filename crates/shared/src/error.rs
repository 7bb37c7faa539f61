//! Protocol error types

use thiserror::Error;

/// Failure to move a message across the wire format
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// Frame is not valid JSON, lacks `type`, or its payload does not match the tag
    #[error("Failed to decode frame: {0}")]
    Decode(#[source] serde_json::Error),

    /// Message could not be serialized
    #[error("Failed to encode message: {0}")]
    Encode(#[source] serde_json::Error),
}
