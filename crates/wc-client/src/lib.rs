//! wc-client: Control client for the wcscanner turntable
//!
//! The client holds a single WebSocket to the scanner, reconnects it a
//! bounded number of times when it drops, feeds inbound events into UI
//! state and writes user actions out as protocol commands.

pub mod connection;
pub mod dispatch;
pub mod input;
pub mod runtime;

#[cfg(test)]
mod testutil;

pub use connection::{ConnectionManager, LinkEvent, RetryDecision, RetryPolicy, WsConnector};
pub use dispatch::{LogRenderer, MessageDispatcher, Renderer, UiState, View};
pub use runtime::{ClientRuntime, UserAction};
