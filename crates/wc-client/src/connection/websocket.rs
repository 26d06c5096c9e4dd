//! WebSocket connector
//!
//! Each socket runs in its own task. The task reports lifecycle and inbound
//! text as [`SocketNotice`]s and drains outbound frames from its
//! [`SocketHandle`] until either side closes.

use std::time::Duration;

use futures::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::Message;

use wc_core::traits::{
    Connector, NoticeSender, SocketCommand, SocketEvent, SocketHandle, SocketNotice,
};

/// How long a handshake may take before the attempt counts as closed.
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Opens real WebSocket connections with tokio-tungstenite
#[derive(Debug, Clone)]
pub struct WsConnector {
    connect_timeout: Duration,
}

impl WsConnector {
    pub fn new() -> Self {
        Self {
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
        }
    }

    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }
}

impl Default for WsConnector {
    fn default() -> Self {
        Self::new()
    }
}

impl Connector for WsConnector {
    fn open(&mut self, endpoint: &str, generation: u64, notices: NoticeSender) -> SocketHandle {
        let (command_tx, command_rx) = mpsc::unbounded_channel();

        tokio::spawn(run_socket(
            endpoint.to_string(),
            generation,
            notices,
            command_rx,
            self.connect_timeout,
        ));

        SocketHandle::new(generation, command_tx)
    }
}

/// Drive one socket from handshake to close
async fn run_socket(
    endpoint: String,
    generation: u64,
    notices: NoticeSender,
    mut commands: mpsc::UnboundedReceiver<SocketCommand>,
    connect_timeout: Duration,
) {
    let notify = |event: SocketEvent| {
        // The manager may already be gone during shutdown
        let _ = notices.send(SocketNotice { generation, event });
    };

    tracing::debug!(generation, "Connecting to {}", endpoint);
    let ws = match tokio::time::timeout(
        connect_timeout,
        tokio_tungstenite::connect_async(endpoint.as_str()),
    )
    .await
    {
        Ok(Ok((ws, _response))) => ws,
        Ok(Err(e)) => {
            tracing::debug!(generation, "Handshake with {} failed: {}", endpoint, e);
            notify(SocketEvent::Closed {
                reason: Some(e.to_string()),
            });
            return;
        }
        Err(_) => {
            tracing::debug!(generation, "Handshake with {} timed out", endpoint);
            notify(SocketEvent::Closed {
                reason: Some("connection timed out".to_string()),
            });
            return;
        }
    };

    notify(SocketEvent::Opened);
    let (mut sink, mut stream) = ws.split();

    let reason = loop {
        tokio::select! {
            frame = stream.next() => match frame {
                Some(Ok(Message::Text(text))) => {
                    notify(SocketEvent::Message(text.as_str().to_owned()));
                }
                Some(Ok(Message::Close(frame))) => {
                    break frame.map(|f| f.reason.as_str().to_owned());
                }
                Some(Ok(other)) => {
                    tracing::trace!(generation, "Ignoring non-text frame: {:?}", other);
                }
                Some(Err(e)) => break Some(e.to_string()),
                None => break None,
            },

            command = commands.recv() => match command {
                Some(SocketCommand::Send(frame)) => {
                    if let Err(e) = sink.send(Message::Text(frame.into())).await {
                        break Some(e.to_string());
                    }
                }
                Some(SocketCommand::Close) | None => {
                    let _ = sink.close().await;
                    break Some("closed by client".to_string());
                }
            },
        }
    };

    tracing::debug!(generation, "Socket closed: {:?}", reason);
    notify(SocketEvent::Closed { reason });
}
