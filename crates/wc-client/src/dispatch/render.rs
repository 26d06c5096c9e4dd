//! Rendering seam
//!
//! Page markup lives outside this crate. A [`Renderer`] is told which view
//! to redraw and gets read access to the state to draw it from.

use wc_protocol::PictureResolution;

use super::ui_state::{UiState, View};

/// Draws views from UI state
pub trait Renderer {
    /// Redraw `view` from `state`
    fn render(&mut self, view: View, state: &UiState);

    /// Update the online/offline indicator
    fn connection_indicator(&mut self, online: bool);
}

/// Renderer that writes a summary of each view to the log
#[derive(Debug, Default)]
pub struct LogRenderer;

impl Renderer for LogRenderer {
    fn render(&mut self, view: View, state: &UiState) {
        match view {
            View::Home => {
                tracing::info!(
                    online = state.online,
                    "[home] scanner {}",
                    if state.online { "ready" } else { "loading..." }
                );
            }
            View::Projects => {
                tracing::info!("[projects] {} project(s)", state.projects.len());
                for project in &state.projects {
                    tracing::info!(
                        "  {} - {} ({} pictures/rotation, {}, {} Mb)",
                        project.name,
                        project.description,
                        project.pict_per_rotation,
                        project.pict_res,
                        project.size
                    );
                    if let Some(resolution) = project.resolution() {
                        tracing::debug!(
                            "    {}",
                            describe_estimate(resolution, project.pict_per_rotation)
                        );
                    }
                }
                if let Some(disk) = &state.disk_usage {
                    tracing::info!("  disk: {}", disk);
                }
                if let Some(name) = &state.download_ready {
                    tracing::info!("  download ready: {}", name);
                }
            }
            View::Control => {
                tracing::info!(
                    "[control] preview frame of {} bytes",
                    state.camera_preview.len()
                );
            }
        }
    }

    fn connection_indicator(&mut self, online: bool) {
        if online {
            tracing::info!("Scanner online");
        } else {
            tracing::warn!("Scanner offline");
        }
    }
}

/// Human readable size estimate for a capture configuration
pub fn describe_estimate(resolution: PictureResolution, pict_per_rotation: u32) -> String {
    format!(
        "Estimated size : {:.2}Mb / complete rotation",
        resolution.estimated_rotation_mb(pict_per_rotation)
    )
}
