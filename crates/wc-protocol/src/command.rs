//! Outbound commands (client → scanner)
//!
//! Every command is a flat JSON object with an `action` discriminator.
//! Payload values are always strings on the wire, so numeric inputs are
//! converted to text when a command is built.
//!
//! | action | fields |
//! |---|---|
//! | `turn_bed_CW` / `turn_bed_CCW` | `plateau_degree` |
//! | `camera_preview` | |
//! | `loop_capture` | `project_name` |
//! | `delete_project` | `project_name` |
//! | `create_project` | `project_name`, `description`, `pict_per_rotation`, `pict_res` |
//! | `request_upload_email_project` | `project_name`, `email_to` |
//! | `request_project_info` | |
//! | `request_zip_data` | `project_name` |

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::resolution::PictureResolution;

/// Rotation direction of the turntable bed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnDirection {
    /// Clockwise
    Clockwise,
    /// Counter-clockwise
    CounterClockwise,
}

/// A command sent to the scanner
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action")]
pub enum OutboundCommand {
    /// Rotate the bed clockwise by `plateau_degree` degrees
    #[serde(rename = "turn_bed_CW")]
    TurnBedCw { plateau_degree: String },

    /// Rotate the bed counter-clockwise by `plateau_degree` degrees
    #[serde(rename = "turn_bed_CCW")]
    TurnBedCcw { plateau_degree: String },

    /// Ask for a fresh camera preview frame
    #[serde(rename = "camera_preview")]
    CameraPreview,

    /// Run a full capture loop into an existing project
    #[serde(rename = "loop_capture")]
    LoopCapture { project_name: String },

    /// Delete a project on the scanner
    #[serde(rename = "delete_project")]
    DeleteProject { project_name: String },

    /// Create a new, empty project
    #[serde(rename = "create_project")]
    CreateProject {
        project_name: String,
        description: String,
        pict_per_rotation: String,
        pict_res: String,
    },

    /// Zip a project and mail it
    #[serde(rename = "request_upload_email_project")]
    RequestUploadEmailProject {
        project_name: String,
        email_to: String,
    },

    /// Ask the scanner to push its project list
    #[serde(rename = "request_project_info")]
    RequestProjectInfo,

    /// Zip a project for download; answered by `download_ready`
    #[serde(rename = "request_zip_data")]
    RequestZipData { project_name: String },
}

impl OutboundCommand {
    /// Build a bed rotation command; the angle is sent as text.
    pub fn turn_bed(direction: TurnDirection, degrees: f64) -> Self {
        let plateau_degree = degrees.to_string();
        match direction {
            TurnDirection::Clockwise => Self::TurnBedCw { plateau_degree },
            TurnDirection::CounterClockwise => Self::TurnBedCcw { plateau_degree },
        }
    }

    /// Build a project creation command.
    ///
    /// `pict_res` carries the human readable resolution label, which is
    /// what the scanner stores alongside the project.
    pub fn create_project(
        project_name: impl Into<String>,
        description: impl Into<String>,
        pict_per_rotation: u32,
        resolution: PictureResolution,
    ) -> Self {
        Self::CreateProject {
            project_name: project_name.into(),
            description: description.into(),
            pict_per_rotation: pict_per_rotation.to_string(),
            pict_res: resolution.label().to_string(),
        }
    }

    pub fn loop_capture(project_name: impl Into<String>) -> Self {
        Self::LoopCapture {
            project_name: project_name.into(),
        }
    }

    pub fn delete_project(project_name: impl Into<String>) -> Self {
        Self::DeleteProject {
            project_name: project_name.into(),
        }
    }

    pub fn upload_by_email(project_name: impl Into<String>, email_to: impl Into<String>) -> Self {
        Self::RequestUploadEmailProject {
            project_name: project_name.into(),
            email_to: email_to.into(),
        }
    }

    pub fn zip_data(project_name: impl Into<String>) -> Self {
        Self::RequestZipData {
            project_name: project_name.into(),
        }
    }

    /// The `action` tag this command is sent under
    pub fn action(&self) -> &'static str {
        match self {
            Self::TurnBedCw { .. } => "turn_bed_CW",
            Self::TurnBedCcw { .. } => "turn_bed_CCW",
            Self::CameraPreview => "camera_preview",
            Self::LoopCapture { .. } => "loop_capture",
            Self::DeleteProject { .. } => "delete_project",
            Self::CreateProject { .. } => "create_project",
            Self::RequestUploadEmailProject { .. } => "request_upload_email_project",
            Self::RequestProjectInfo => "request_project_info",
            Self::RequestZipData { .. } => "request_zip_data",
        }
    }
}

impl fmt::Display for OutboundCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.action())
    }
}
