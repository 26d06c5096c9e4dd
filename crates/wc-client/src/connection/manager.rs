//! Connection lifecycle
//!
//! The manager owns the single socket to the scanner and is the only
//! place its state changes:
//!
//! ```text
//! Closed --connect()--> Connecting --Opened--> Open --Closed--> Closed
//!                            \------------Closed-----------------^
//! ```
//!
//! A periodic liveness check reconnects a closed socket and charges the
//! attempt to the [`RetryPolicy`]; once that is exhausted the client is
//! told to shut down.

use tokio::sync::{broadcast, mpsc};

use wc_core::config::ClientConfig;
use wc_core::traits::{
    Connector, NoticeReceiver, NoticeSender, SocketEvent, SocketHandle, SocketNotice,
};
use wc_core::{ConnectionError, ConnectionState};
use wc_protocol::{InboundEvent, OutboundCommand};

use super::retry::{RetryDecision, RetryPolicy};

/// Capacity of the link status broadcast channel
const LINK_EVENT_CAPACITY: usize = 64;

/// Connectivity change published to subscribers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkEvent {
    /// The socket opened
    Online,
    /// The socket closed or failed to open
    Offline,
}

/// What a socket notice amounted to
#[derive(Debug, Clone, PartialEq)]
pub enum Incoming {
    /// Connectivity changed
    Link(LinkEvent),
    /// A decoded event to dispatch
    Event(InboundEvent),
}

/// Result of a liveness check that did not end the client
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Liveness {
    /// Socket is open or still connecting
    Alive,
    /// Socket was closed; a new one is being opened
    Reconnecting { attempt: u32 },
}

/// Owns the connection to the scanner
pub struct ConnectionManager<C> {
    endpoint: String,
    connector: C,
    state: ConnectionState,
    socket: Option<SocketHandle>,
    /// Generation of the newest socket; notices from older ones are dropped
    generation: u64,
    retry: RetryPolicy,
    reset_retry_on_open: bool,
    request_preview_on_open: bool,
    notices: NoticeSender,
    link_tx: broadcast::Sender<LinkEvent>,
}

impl<C: Connector> ConnectionManager<C> {
    /// Create a manager and the receiver its sockets report to.
    ///
    /// Nothing is opened until [`connect`](Self::connect) is called.
    pub fn new(config: &ClientConfig, connector: C) -> (Self, NoticeReceiver) {
        let (notices, notice_rx) = mpsc::unbounded_channel();
        let (link_tx, _) = broadcast::channel(LINK_EVENT_CAPACITY);

        let manager = Self {
            endpoint: config.endpoint.clone(),
            connector,
            state: ConnectionState::Closed,
            socket: None,
            generation: 0,
            retry: RetryPolicy::from_config(&config.retry),
            reset_retry_on_open: config.retry.reset_on_open,
            request_preview_on_open: config.request_preview_on_open,
            notices,
            link_tx,
        };

        (manager, notice_rx)
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    pub fn retry(&self) -> &RetryPolicy {
        &self.retry
    }

    /// Subscribe to connectivity changes
    pub fn subscribe(&self) -> broadcast::Receiver<LinkEvent> {
        self.link_tx.subscribe()
    }

    /// Open a new socket unless one is already open or opening.
    ///
    /// Returns whether a socket was started.
    pub fn connect(&mut self) -> bool {
        if self.state != ConnectionState::Closed {
            tracing::trace!("connect() ignored, connection is {}", self.state);
            return false;
        }

        self.generation += 1;
        let socket = self
            .connector
            .open(&self.endpoint, self.generation, self.notices.clone());
        self.socket = Some(socket);
        self.state = ConnectionState::Connecting;

        tracing::info!(
            generation = self.generation,
            "Connecting to scanner at {}",
            self.endpoint
        );
        true
    }

    /// Write one command to the open socket.
    ///
    /// Fails with [`ConnectionError::NotConnected`] unless the connection is
    /// open; nothing is queued for later.
    pub fn send(&self, command: &OutboundCommand) -> Result<(), ConnectionError> {
        let socket = match (&self.socket, self.state) {
            (Some(socket), ConnectionState::Open) => socket,
            (_, state) => return Err(ConnectionError::NotConnected { state }),
        };

        let frame = wc_protocol::encode(command)?;
        socket.send_text(frame)?;

        tracing::debug!(action = command.action(), "Command sent");
        Ok(())
    }

    /// Apply a notice from a socket
    pub fn handle_notice(&mut self, notice: SocketNotice) -> Option<Incoming> {
        if notice.generation != self.generation || self.socket.is_none() {
            tracing::debug!(
                generation = notice.generation,
                current = self.generation,
                "Ignoring notice from stale socket: {:?}",
                notice.event
            );
            return None;
        }

        match notice.event {
            SocketEvent::Opened => Some(self.on_open()),
            SocketEvent::Closed { reason } => Some(self.on_close(reason)),
            SocketEvent::Message(text) => match wc_protocol::decode(&text) {
                Ok(event) => Some(Incoming::Event(event)),
                Err(e) => {
                    tracing::warn!("Dropping undecodable frame: {}", e);
                    None
                }
            },
        }
    }

    fn on_open(&mut self) -> Incoming {
        self.state = ConnectionState::Open;
        if self.reset_retry_on_open {
            self.retry.reset();
        }
        tracing::info!("Connected to scanner at {}", self.endpoint);

        let _ = self.link_tx.send(LinkEvent::Online);

        if self.request_preview_on_open {
            if let Err(e) = self.send(&OutboundCommand::CameraPreview) {
                tracing::warn!("Failed to request camera preview: {}", e);
            }
        }

        Incoming::Link(LinkEvent::Online)
    }

    fn on_close(&mut self, reason: Option<String>) -> Incoming {
        let previous = self.state;
        self.state = ConnectionState::Closed;
        self.socket = None;

        match previous {
            ConnectionState::Open => tracing::warn!(
                "Connection to scanner lost: {}",
                reason.as_deref().unwrap_or("no reason given")
            ),
            _ => tracing::debug!(
                "Connection attempt failed: {}",
                reason.as_deref().unwrap_or("no reason given")
            ),
        }

        let _ = self.link_tx.send(LinkEvent::Offline);
        Incoming::Link(LinkEvent::Offline)
    }

    /// Periodic check: reconnect a closed socket and charge the attempt.
    ///
    /// Returns [`ConnectionError::UnrecoverableDisconnect`] once the retry
    /// budget is spent; the caller must then shut the client down.
    pub fn check_liveness(&mut self) -> Result<Liveness, ConnectionError> {
        if self.state != ConnectionState::Closed {
            return Ok(Liveness::Alive);
        }

        self.connect();

        match self.retry.record_attempt() {
            RetryDecision::Continue => {
                let attempt = self.retry.attempts();
                tracing::info!(
                    "Reconnect attempt {}/{}",
                    attempt,
                    self.retry.max_attempts()
                );
                Ok(Liveness::Reconnecting { attempt })
            }
            RetryDecision::Unrecoverable => {
                tracing::error!(
                    "Giving up on {} after {} reconnect attempts",
                    self.endpoint,
                    self.retry.max_attempts()
                );
                Err(ConnectionError::UnrecoverableDisconnect {
                    attempts: self.retry.max_attempts(),
                })
            }
        }
    }

    /// Close the socket for good; late notices from it are ignored
    pub fn shutdown(&mut self) {
        if let Some(socket) = self.socket.take() {
            socket.close();
        }
        self.state = ConnectionState::Closed;
        self.generation += 1;
        tracing::debug!("Connection manager shut down");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::FakeConnector;
    use wc_core::traits::SocketCommand;
    use wc_protocol::TurnDirection;

    fn manager_with(config: ClientConfig) -> (ConnectionManager<FakeConnector>, FakeConnector) {
        let fake = FakeConnector::new();
        let (manager, _rx) = ConnectionManager::new(&config, fake.clone());
        (manager, fake)
    }

    fn quiet_config() -> ClientConfig {
        ClientConfig {
            request_preview_on_open: false,
            ..Default::default()
        }
    }

    fn notice(generation: u64, event: SocketEvent) -> SocketNotice {
        SocketNotice { generation, event }
    }

    fn closed() -> SocketEvent {
        SocketEvent::Closed { reason: None }
    }

    #[test]
    fn test_connect_is_idempotent() {
        let (mut manager, fake) = manager_with(quiet_config());

        assert!(manager.connect());
        assert!(!manager.connect());
        assert!(!manager.connect());

        assert_eq!(fake.open_count(), 1);
        assert_eq!(manager.state(), ConnectionState::Connecting);
        assert_eq!(
            fake.last_open(),
            Some(("ws://wcscanner.local:6789".to_string(), 1))
        );

        manager.handle_notice(notice(1, SocketEvent::Opened));
        assert!(!manager.connect());
        assert_eq!(fake.open_count(), 1);
    }

    #[test]
    fn test_state_follows_last_lifecycle_event() {
        let (mut manager, _fake) = manager_with(quiet_config());

        // Closed before any open, repeated closes, reopen, failed handshakes
        let sequence = [
            closed(),
            SocketEvent::Opened,
            closed(),
            closed(),
            SocketEvent::Opened,
            SocketEvent::Opened,
            closed(),
            closed(),
            closed(),
            SocketEvent::Opened,
            closed(),
        ];

        for event in sequence {
            if manager.state() == ConnectionState::Closed {
                assert!(manager.connect());
                assert_eq!(manager.state(), ConnectionState::Connecting);
            }
            let generation = manager.generation;
            let expected = match event {
                SocketEvent::Opened => ConnectionState::Open,
                _ => ConnectionState::Closed,
            };

            let incoming = manager.handle_notice(notice(generation, event));

            assert_eq!(manager.state(), expected);
            let link = match expected {
                ConnectionState::Open => LinkEvent::Online,
                _ => LinkEvent::Offline,
            };
            assert_eq!(incoming, Some(Incoming::Link(link)));
        }
    }

    #[test]
    fn test_stale_notices_are_ignored() {
        let (mut manager, _fake) = manager_with(quiet_config());
        manager.connect();
        manager.handle_notice(notice(1, closed()));
        manager.connect();

        // Late Opened from the first socket must not mark the second open
        assert_eq!(manager.handle_notice(notice(1, SocketEvent::Opened)), None);
        assert_eq!(manager.state(), ConnectionState::Connecting);

        manager.handle_notice(notice(2, SocketEvent::Opened));
        assert_eq!(manager.state(), ConnectionState::Open);
    }

    #[test]
    fn test_send_while_open_writes_one_frame() {
        let (mut manager, fake) = manager_with(quiet_config());
        manager.connect();
        manager.handle_notice(notice(1, SocketEvent::Opened));

        let command = OutboundCommand::turn_bed(TurnDirection::Clockwise, 30.0);
        manager.send(&command).unwrap();

        let frames = fake.frames();
        assert_eq!(frames.len(), 1);
        assert_eq!(wc_protocol::decode_command(&frames[0]).unwrap(), command);
    }

    #[test]
    fn test_send_while_not_open_fails() {
        let (mut manager, fake) = manager_with(quiet_config());
        let command = OutboundCommand::loop_capture("vase");

        assert!(matches!(
            manager.send(&command),
            Err(ConnectionError::NotConnected {
                state: ConnectionState::Closed
            })
        ));

        manager.connect();
        assert!(matches!(
            manager.send(&command),
            Err(ConnectionError::NotConnected {
                state: ConnectionState::Connecting
            })
        ));
        assert!(fake.written().is_empty());
    }

    #[test]
    fn test_open_requests_camera_preview() {
        let (mut manager, fake) = manager_with(ClientConfig::default());
        let mut links = manager.subscribe();
        manager.connect();

        let incoming = manager.handle_notice(notice(1, SocketEvent::Opened));
        assert_eq!(incoming, Some(Incoming::Link(LinkEvent::Online)));
        assert_eq!(links.try_recv().unwrap(), LinkEvent::Online);

        let frames = fake.frames();
        assert_eq!(frames, vec![r#"{"action":"camera_preview"}"#.to_string()]);
    }

    #[test]
    fn test_messages_are_decoded() {
        let (mut manager, _fake) = manager_with(quiet_config());
        manager.connect();
        manager.handle_notice(notice(1, SocketEvent::Opened));

        let incoming = manager.handle_notice(notice(
            1,
            SocketEvent::Message(r#"{"type":"camera_preview","data":"abc"}"#.to_string()),
        ));
        assert_eq!(
            incoming,
            Some(Incoming::Event(InboundEvent::CameraPreview("abc".to_string())))
        );

        let incoming =
            manager.handle_notice(notice(1, SocketEvent::Message("{oops".to_string())));
        assert_eq!(incoming, None);
        assert_eq!(manager.state(), ConnectionState::Open);
    }

    #[test]
    fn test_liveness_while_closed_connects_and_records_once() {
        let (mut manager, fake) = manager_with(quiet_config());

        let outcome = manager.check_liveness().unwrap();
        assert_eq!(outcome, Liveness::Reconnecting { attempt: 1 });
        assert_eq!(fake.open_count(), 1);
        assert_eq!(manager.retry().attempts(), 1);

        // Still connecting: nothing happens
        assert_eq!(manager.check_liveness().unwrap(), Liveness::Alive);
        assert_eq!(fake.open_count(), 1);
        assert_eq!(manager.retry().attempts(), 1);

        manager.handle_notice(notice(1, closed()));
        manager.check_liveness().unwrap();
        assert_eq!(fake.open_count(), 2);
        assert_eq!(manager.retry().attempts(), 2);
    }

    #[test]
    fn test_liveness_gives_up_after_ten_attempts() {
        let (mut manager, _fake) = manager_with(quiet_config());

        for generation in 1..=10 {
            assert!(manager.check_liveness().is_ok());
            manager.handle_notice(notice(generation, closed()));
        }

        let err = manager.check_liveness().unwrap_err();
        assert!(matches!(
            err,
            ConnectionError::UnrecoverableDisconnect { attempts: 10 }
        ));
        assert!(err.is_fatal());
    }

    #[test]
    fn test_counter_survives_successful_open_by_default() {
        let (mut manager, _fake) = manager_with(quiet_config());
        manager.check_liveness().unwrap();
        manager.handle_notice(notice(1, SocketEvent::Opened));

        assert_eq!(manager.retry().attempts(), 1);
    }

    #[test]
    fn test_counter_resets_on_open_when_configured() {
        let mut config = quiet_config();
        config.retry.reset_on_open = true;
        let (mut manager, _fake) = manager_with(config);

        manager.check_liveness().unwrap();
        manager.handle_notice(notice(1, SocketEvent::Opened));

        assert_eq!(manager.retry().attempts(), 0);
    }

    #[test]
    fn test_shutdown_closes_socket() {
        let (mut manager, fake) = manager_with(quiet_config());
        manager.connect();
        manager.handle_notice(notice(1, SocketEvent::Opened));

        manager.shutdown();
        assert_eq!(manager.state(), ConnectionState::Closed);
        assert_eq!(fake.written(), vec![SocketCommand::Close]);

        // The socket's own Closed notice arrives late and changes nothing
        assert_eq!(manager.handle_notice(notice(1, closed())), None);
    }
}
