//! Transport traits
//!
//! A [`Connector`] turns an endpoint into a running socket. The socket
//! reports its lifecycle and inbound text on a channel instead of through
//! callbacks, and accepts outbound frames through a [`SocketHandle`].

use tokio::sync::mpsc;

use crate::error::ConnectionError;

/// Something that happened on a socket
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SocketEvent {
    /// Handshake completed
    Opened,
    /// A text frame arrived
    Message(String),
    /// The socket closed, or never managed to open
    Closed { reason: Option<String> },
}

/// A [`SocketEvent`] tagged with the socket that produced it
///
/// Every socket gets a fresh generation number, so events still in flight
/// from a replaced socket can be told apart from the current one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SocketNotice {
    pub generation: u64,
    pub event: SocketEvent,
}

pub type NoticeSender = mpsc::UnboundedSender<SocketNotice>;
pub type NoticeReceiver = mpsc::UnboundedReceiver<SocketNotice>;

/// Instruction for the task driving a socket
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SocketCommand {
    /// Write one text frame
    Send(String),
    /// Close the socket
    Close,
}

/// Write side of a socket
#[derive(Debug)]
pub struct SocketHandle {
    generation: u64,
    commands: mpsc::UnboundedSender<SocketCommand>,
}

impl SocketHandle {
    pub fn new(generation: u64, commands: mpsc::UnboundedSender<SocketCommand>) -> Self {
        Self {
            generation,
            commands,
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Queue a text frame; returns immediately, delivery is not confirmed
    pub fn send_text(&self, frame: String) -> Result<(), ConnectionError> {
        self.commands
            .send(SocketCommand::Send(frame))
            .map_err(|_| ConnectionError::SocketGone)
    }

    /// Ask the socket to close; a socket that is already gone is fine
    pub fn close(&self) {
        let _ = self.commands.send(SocketCommand::Close);
    }
}

/// Opens sockets to the scanner
pub trait Connector: Send {
    /// Start opening a socket to `endpoint`.
    ///
    /// Must not block. The outcome is reported later on `notices` as
    /// `Opened` or `Closed`, tagged with `generation`.
    fn open(&mut self, endpoint: &str, generation: u64, notices: NoticeSender) -> SocketHandle;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handle_forwards_frames() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let handle = SocketHandle::new(3, tx);

        handle.send_text("{\"action\":\"camera_preview\"}".to_string()).unwrap();
        handle.close();

        assert_eq!(handle.generation(), 3);
        assert_eq!(
            rx.try_recv().unwrap(),
            SocketCommand::Send("{\"action\":\"camera_preview\"}".to_string())
        );
        assert_eq!(rx.try_recv().unwrap(), SocketCommand::Close);
    }

    #[test]
    fn test_send_after_socket_gone() {
        let (tx, rx) = mpsc::unbounded_channel();
        let handle = SocketHandle::new(1, tx);
        drop(rx);

        assert!(matches!(
            handle.send_text("x".to_string()),
            Err(ConnectionError::SocketGone)
        ));
        handle.close();
    }
}
