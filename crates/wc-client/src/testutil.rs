//! Test doubles shared by unit tests

use std::sync::{Arc, Mutex};

use tokio::sync::mpsc;

use wc_core::traits::{
    Connector, NoticeSender, SocketCommand, SocketEvent, SocketHandle, SocketNotice,
};

use crate::dispatch::{Renderer, UiState, View};

/// Connector that records every open and hands sockets back to the test
#[derive(Clone, Default)]
pub struct FakeConnector {
    inner: Arc<Mutex<FakeSockets>>,
}

#[derive(Default)]
struct FakeSockets {
    opens: Vec<(String, u64)>,
    commands: Vec<mpsc::UnboundedReceiver<SocketCommand>>,
    notices: Option<NoticeSender>,
    refuse: bool,
}

impl FakeConnector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Connector whose sockets close as soon as they are opened
    pub fn refusing() -> Self {
        let connector = Self::default();
        connector.inner.lock().unwrap().refuse = true;
        connector
    }

    /// Number of sockets opened so far
    pub fn open_count(&self) -> usize {
        self.inner.lock().unwrap().opens.len()
    }

    /// Endpoint and generation of the latest socket
    pub fn last_open(&self) -> Option<(String, u64)> {
        self.inner.lock().unwrap().opens.last().cloned()
    }

    /// Drain everything written to the latest socket
    pub fn written(&self) -> Vec<SocketCommand> {
        let mut inner = self.inner.lock().unwrap();
        let mut written = Vec::new();
        if let Some(rx) = inner.commands.last_mut() {
            while let Ok(command) = rx.try_recv() {
                written.push(command);
            }
        }
        written
    }

    /// Drain the text frames written to the latest socket
    pub fn frames(&self) -> Vec<String> {
        self.written()
            .into_iter()
            .filter_map(|command| match command {
                SocketCommand::Send(frame) => Some(frame),
                SocketCommand::Close => None,
            })
            .collect()
    }

    /// Push an event as if the latest socket produced it
    pub fn emit(&self, event: SocketEvent) {
        let inner = self.inner.lock().unwrap();
        let generation = inner.opens.last().map(|(_, g)| *g).unwrap_or_default();
        if let Some(tx) = &inner.notices {
            tx.send(SocketNotice { generation, event }).unwrap();
        }
    }
}

impl Connector for FakeConnector {
    fn open(&mut self, endpoint: &str, generation: u64, notices: NoticeSender) -> SocketHandle {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut inner = self.inner.lock().unwrap();
        inner.opens.push((endpoint.to_string(), generation));
        inner.commands.push(rx);
        if inner.refuse {
            notices
                .send(SocketNotice {
                    generation,
                    event: SocketEvent::Closed {
                        reason: Some("connection refused".to_string()),
                    },
                })
                .unwrap();
        }
        inner.notices = Some(notices);
        SocketHandle::new(generation, tx)
    }
}

/// Renderer that remembers what it was asked to draw
#[derive(Clone, Default)]
pub struct RecordingRenderer {
    pub renders: Arc<Mutex<Vec<View>>>,
    pub indicators: Arc<Mutex<Vec<bool>>>,
}

impl RecordingRenderer {
    pub fn renders(&self) -> Vec<View> {
        self.renders.lock().unwrap().clone()
    }

    pub fn indicators(&self) -> Vec<bool> {
        self.indicators.lock().unwrap().clone()
    }
}

impl Renderer for RecordingRenderer {
    fn render(&mut self, view: View, _state: &UiState) {
        self.renders.lock().unwrap().push(view);
    }

    fn connection_indicator(&mut self, online: bool) {
        self.indicators.lock().unwrap().push(online);
    }
}
