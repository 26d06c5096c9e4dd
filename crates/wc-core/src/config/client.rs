//! Client configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

use crate::error::ConfigError;

/// Default scanner address, as advertised over mDNS by the device
pub const DEFAULT_ENDPOINT: &str = "ws://wcscanner.local:6789";

/// Configuration for the control client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// WebSocket URL of the scanner (`ws://host:port`)
    pub endpoint: String,

    /// Period of the liveness check that drives reconnects
    #[serde(with = "duration_millis")]
    pub liveness_interval: Duration,

    /// Request a camera preview as soon as the socket opens
    pub request_preview_on_open: bool,

    /// Reconnect limits
    pub retry: RetryConfig,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            liveness_interval: Duration::from_millis(1000),
            request_preview_on_open: true,
            retry: RetryConfig::default(),
        }
    }
}

impl ClientConfig {
    /// Check the configuration before a client is built from it
    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = Url::parse(&self.endpoint).map_err(|e| ConfigError::InvalidEndpoint {
            endpoint: self.endpoint.clone(),
            reason: e.to_string(),
        })?;

        if !matches!(url.scheme(), "ws" | "wss") {
            return Err(ConfigError::InvalidEndpoint {
                endpoint: self.endpoint.clone(),
                reason: format!("unsupported scheme '{}', expected ws or wss", url.scheme()),
            });
        }

        if url.host_str().map_or(true, str::is_empty) {
            return Err(ConfigError::InvalidEndpoint {
                endpoint: self.endpoint.clone(),
                reason: "missing host".to_string(),
            });
        }

        if self.liveness_interval.is_zero() {
            return Err(ConfigError::Invalid(
                "liveness_interval must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }
}

/// Turn a bare host (`scanner`, `10.0.0.5:7000`) into a WebSocket URL.
///
/// Inputs that already carry a scheme are returned unchanged; bare hosts
/// without a port get the scanner's default port.
pub fn normalize_endpoint(input: &str) -> String {
    let input = input.trim();
    if input.contains("://") {
        return input.to_string();
    }
    if input.contains(':') {
        format!("ws://{}", input)
    } else {
        format!("ws://{}:{}", input, wc_protocol::DEFAULT_PORT)
    }
}

/// Reconnect attempt limits
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Attempts allowed before the client gives up for good
    pub max_attempts: u32,

    /// Reset the attempt counter every time the socket opens.
    ///
    /// Off by default: the counter then spans the whole process lifetime,
    /// so ten reconnects in total exhaust it, not ten in a row.
    pub reset_on_open: bool,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 10,
            reset_on_open: false,
        }
    }
}

/// `liveness_interval` is written as whole milliseconds
mod duration_millis {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(interval: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(u64::try_from(interval.as_millis()).unwrap_or(u64::MAX))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}
