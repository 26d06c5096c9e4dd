//! UI state fed by scanner events

use std::fmt;
use std::str::FromStr;

use serde_json::Value;
use wc_protocol::ProjectRecord;

/// 5x5 placeholder shown until the scanner sends a real preview
pub const PLACEHOLDER_PREVIEW: &str = "data:image/jpg;base64, iVBORw0KGgoAAAANSUhEUgAAAAUAAAAFCAYAAACNbyblAAAAHElEQVQI12P4//8/w38GIAXDIBKE0DHxgljNBAAO9TXL0Y4OHwAAAABJRU5ErkJggg==";

/// Page currently shown to the user
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum View {
    #[default]
    Home,
    Projects,
    Control,
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            View::Home => write!(f, "home"),
            View::Projects => write!(f, "projects"),
            View::Control => write!(f, "control"),
        }
    }
}

impl FromStr for View {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "home" => Ok(View::Home),
            "projects" | "project" => Ok(View::Projects),
            "control" => Ok(View::Control),
            other => Err(format!("unknown view '{}'", other)),
        }
    }
}

/// Everything the UI draws from
#[derive(Debug, Clone, PartialEq)]
pub struct UiState {
    /// Whether the socket is open
    pub online: bool,
    pub active_view: View,
    /// Project list, in the order the scanner sent it
    pub projects: Vec<ProjectRecord>,
    /// Latest camera frame
    pub camera_preview: String,
    /// Disk usage as last reported with `state_data`
    pub disk_usage: Option<Value>,
    /// Last project announced by `download_ready`
    pub download_ready: Option<String>,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            online: false,
            active_view: View::Home,
            projects: Vec::new(),
            camera_preview: PLACEHOLDER_PREVIEW.to_string(),
            disk_usage: None,
            download_ready: None,
        }
    }
}

impl UiState {
    /// Look up a project by its unique name
    pub fn project(&self, name: &str) -> Option<&ProjectRecord> {
        self.projects.iter().find(|p| p.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_view_parse() {
        assert_eq!("Projects".parse::<View>(), Ok(View::Projects));
        assert_eq!("control".parse::<View>(), Ok(View::Control));
        assert!("settings".parse::<View>().is_err());
    }

    #[test]
    fn test_default_state() {
        let state = UiState::default();
        assert!(!state.online);
        assert_eq!(state.active_view, View::Home);
        assert_eq!(state.camera_preview, PLACEHOLDER_PREVIEW);
        assert!(state.project("P1").is_none());
    }
}
