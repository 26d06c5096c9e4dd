//! Core domain types

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle state of the connection to the scanner
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConnectionState {
    /// No socket, or the last socket closed
    #[default]
    Closed,
    /// Socket created, handshake in progress
    Connecting,
    /// Socket open, commands may be written
    Open,
}

impl ConnectionState {
    pub fn is_open(&self) -> bool {
        matches!(self, ConnectionState::Open)
    }
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConnectionState::Closed => write!(f, "closed"),
            ConnectionState::Connecting => write!(f, "connecting"),
            ConnectionState::Open => write!(f, "open"),
        }
    }
}
