//! Routes decoded scanner events to UI state

use wc_protocol::InboundEvent;

use crate::connection::LinkEvent;

use super::render::Renderer;
use super::ui_state::{UiState, View};

/// What dispatching an event did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatched {
    /// State changed and the active view was redrawn
    Rendered(View),
    /// State changed but the affected view is not on screen
    Updated,
    /// Event carries nothing the UI uses
    Ignored,
    /// Event type not recognized
    Unknown,
}

/// Applies inbound events to [`UiState`] in arrival order
pub struct MessageDispatcher<R> {
    state: UiState,
    renderer: R,
}

impl<R: Renderer> MessageDispatcher<R> {
    pub fn new(renderer: R) -> Self {
        Self {
            state: UiState::default(),
            renderer,
        }
    }

    pub fn state(&self) -> &UiState {
        &self.state
    }

    pub fn projects(&self) -> &[wc_protocol::ProjectRecord] {
        &self.state.projects
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// Apply one event
    pub fn dispatch(&mut self, event: InboundEvent) -> Dispatched {
        match event {
            InboundEvent::Users(_) | InboundEvent::State(_) => {
                tracing::trace!("Ignoring {} event", event.event_type());
                Dispatched::Ignored
            }
            InboundEvent::ProjectsData(projects) => {
                tracing::debug!("Received {} project(s)", projects.len());
                self.state.projects = projects;
                self.render_if_active(View::Projects)
            }
            InboundEvent::CameraPreview(image) => {
                self.state.camera_preview = image;
                self.render_if_active(View::Control)
            }
            InboundEvent::StateData {
                projects,
                disk_usage,
            } => {
                self.state.projects = projects;
                self.state.disk_usage = Some(disk_usage);
                self.render_if_active(View::Projects)
            }
            InboundEvent::DownloadReady { project_name } => {
                tracing::info!("Archive for project '{}' is ready", project_name);
                self.state.download_ready = Some(project_name);
                self.render_if_active(View::Projects)
            }
            InboundEvent::Unknown { event_type, .. } => {
                tracing::error!("Unknown message type: {}", event_type);
                Dispatched::Unknown
            }
        }
    }

    /// Reflect a connectivity change.
    ///
    /// Any change of link sends the user back to Home, which shows whether
    /// the scanner is ready or still loading.
    pub fn on_link(&mut self, link: LinkEvent) {
        let online = matches!(link, LinkEvent::Online);
        if self.state.online == online {
            return;
        }
        self.state.online = online;
        self.renderer.connection_indicator(online);
        self.show(View::Home);
    }

    /// Switch the active view and draw it
    pub fn show(&mut self, view: View) {
        self.state.active_view = view;
        self.renderer.render(view, &self.state);
    }

    fn render_if_active(&mut self, view: View) -> Dispatched {
        if self.state.active_view == view {
            self.renderer.render(view, &self.state);
            Dispatched::Rendered(view)
        } else {
            Dispatched::Updated
        }
    }
}
