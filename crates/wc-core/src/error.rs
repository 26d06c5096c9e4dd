//! Core error types for the wcscanner client

use std::path::PathBuf;
use thiserror::Error;
use wc_protocol::EncodeError;

use crate::types::ConnectionState;

/// Connection-related errors
#[derive(Error, Debug)]
pub enum ConnectionError {
    /// A command was attempted while the socket is not open
    #[error("Not connected to the scanner (connection is {state})")]
    NotConnected { state: ConnectionState },

    /// Reconnect attempts exhausted
    #[error("Scanner unreachable after {attempts} reconnect attempts")]
    UnrecoverableDisconnect { attempts: u32 },

    /// The socket task went away while its handle was still held
    #[error("Socket writer is gone")]
    SocketGone,

    /// Command could not be serialized
    #[error(transparent)]
    Encode(#[from] EncodeError),
}

impl ConnectionError {
    /// Whether the client must shut down after this error
    pub fn is_fatal(&self) -> bool {
        matches!(self, ConnectionError::UnrecoverableDisconnect { .. })
    }
}

/// Configuration-related errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Config file not found
    #[error("Config file not found: {0}")]
    NotFound(PathBuf),

    /// Invalid configuration
    #[error("Invalid config: {0}")]
    Invalid(String),

    /// Endpoint is not a usable WebSocket URL
    #[error("Invalid endpoint {endpoint:?}: {reason}")]
    InvalidEndpoint { endpoint: String, reason: String },

    /// TOML parse error
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),

    /// TOML serialize error
    #[error("TOML serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
}
