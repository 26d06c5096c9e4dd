//! Connection to the scanner

mod manager;
mod retry;
mod websocket;

pub use manager::{ConnectionManager, Incoming, LinkEvent, Liveness};
pub use retry::{RetryDecision, RetryPolicy};
pub use websocket::WsConnector;
