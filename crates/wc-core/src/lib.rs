//! wc-core: Core abstractions and configuration for the wcscanner client
//!
//! This crate provides the shared types, the transport seam, the error
//! taxonomy and the configuration structures used by the client.

pub mod config;
pub mod error;
pub mod traits;
pub mod types;

pub use error::{ConfigError, ConnectionError};
pub use types::ConnectionState;
