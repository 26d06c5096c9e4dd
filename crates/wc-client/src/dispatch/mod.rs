//! Inbound event dispatch and UI state

mod dispatcher;
mod render;
mod ui_state;

pub use dispatcher::{Dispatched, MessageDispatcher};
pub use render::{describe_estimate, LogRenderer, Renderer};
pub use ui_state::{UiState, View, PLACEHOLDER_PREVIEW};
