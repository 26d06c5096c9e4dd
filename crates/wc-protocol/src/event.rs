//! Inbound events (scanner → client)
//!
//! Events are JSON objects tagged by `type`. Most carry their payload in
//! `data`; the `state_data` and `download_ready` events pushed by the
//! scanner after each command use top-level fields instead.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::resolution::PictureResolution;

/// A project stored on the scanner
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectRecord {
    /// Project name, unique on the scanner
    pub name: String,
    pub description: String,
    /// Pictures taken per bed rotation
    #[serde(deserialize_with = "lenient::u32_from_any")]
    pub pict_per_rotation: u32,
    /// Resolution preset, either a code or a label
    #[serde(deserialize_with = "lenient::string_from_any")]
    pub pict_res: String,
    /// Base64 thumbnail
    pub preview_data: String,
    /// Size on disk in megabytes
    #[serde(deserialize_with = "lenient::f64_from_any")]
    pub size: f64,
}

impl ProjectRecord {
    /// Resolution preset, if the reported value is a known one
    pub fn resolution(&self) -> Option<PictureResolution> {
        PictureResolution::from_wire(&self.pict_res)
    }
}

/// An event received from the scanner
#[derive(Debug, Clone, PartialEq)]
pub enum InboundEvent {
    /// Connected user count (`users`)
    Users(Value),
    /// Scanner state snapshot (`state`)
    State(Value),
    /// Full project list (`projects_data`)
    ProjectsData(Vec<ProjectRecord>),
    /// Base64 camera frame (`camera_preview`)
    CameraPreview(String),
    /// Project list plus disk usage (`state_data`)
    StateData {
        projects: Vec<ProjectRecord>,
        disk_usage: Value,
    },
    /// A zipped project is ready to fetch (`download_ready`)
    DownloadReady { project_name: String },
    /// Any event type this client does not know about
    Unknown { event_type: String, raw: Value },
}

impl InboundEvent {
    /// The `type` tag this event arrived with
    pub fn event_type(&self) -> &str {
        match self {
            Self::Users(_) => "users",
            Self::State(_) => "state",
            Self::ProjectsData(_) => "projects_data",
            Self::CameraPreview(_) => "camera_preview",
            Self::StateData { .. } => "state_data",
            Self::DownloadReady { .. } => "download_ready",
            Self::Unknown { event_type, .. } => event_type,
        }
    }
}

mod lenient {
    //! The scanner echoes back whatever the creation form sent, so numeric
    //! project fields may arrive as strings.

    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    pub fn string_from_any<'de, D>(deserializer: D) -> Result<String, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Value::deserialize(deserializer)? {
            Value::String(s) => s,
            Value::Null => String::new(),
            other => other.to_string(),
        })
    }

    pub fn u32_from_any<'de, D>(deserializer: D) -> Result<u32, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Value::deserialize(deserializer)? {
            Value::Number(n) => n
                .as_u64()
                .and_then(|n| u32::try_from(n).ok())
                .ok_or_else(|| serde::de::Error::custom(format!("invalid count: {n}"))),
            Value::String(s) => s.trim().parse().map_err(serde::de::Error::custom),
            Value::Null => Ok(0),
            other => Err(serde::de::Error::custom(format!("invalid count: {other}"))),
        }
    }

    pub fn f64_from_any<'de, D>(deserializer: D) -> Result<f64, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Value::deserialize(deserializer)? {
            Value::Number(n) => n
                .as_f64()
                .ok_or_else(|| serde::de::Error::custom(format!("invalid size: {n}"))),
            Value::String(s) => s.trim().parse().map_err(serde::de::Error::custom),
            Value::Null => Ok(0.0),
            other => Err(serde::de::Error::custom(format!("invalid size: {other}"))),
        }
    }
}
