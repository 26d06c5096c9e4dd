//! Protocol error types

use thiserror::Error;

/// Errors raised while decoding an inbound frame
#[derive(Error, Debug)]
pub enum DecodeError {
    /// Frame is not valid JSON
    #[error("Malformed frame: {0}")]
    Malformed(#[source] serde_json::Error),

    /// Frame is JSON but not an object
    #[error("Frame is not a JSON object")]
    NotAnObject,

    /// Object has no string discriminator field
    #[error("Frame has no `{field}` field")]
    MissingTag { field: &'static str },

    /// Payload has the wrong shape for its tag
    #[error("Invalid `{tag}` payload: {source}")]
    InvalidPayload {
        tag: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Errors raised while encoding an outbound command
#[derive(Error, Debug)]
#[error("Failed to encode command: {0}")]
pub struct EncodeError(#[from] pub serde_json::Error);
