//! Client event loop
//!
//! One task owns the connection manager and the dispatcher. Socket notices,
//! the liveness tick and user actions are all handled here in turn, so
//! neither needs locking.

use std::time::Duration;

use tokio::sync::{mpsc, oneshot};
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use wc_core::config::ClientConfig;
use wc_core::traits::{Connector, NoticeReceiver};
use wc_core::ConnectionError;
use wc_protocol::OutboundCommand;

use crate::connection::{ConnectionManager, Incoming, Liveness};
use crate::dispatch::{MessageDispatcher, Renderer, View};

/// Something the user asked for
#[derive(Debug)]
pub enum UserAction {
    /// Write a command to the scanner.
    ///
    /// The outcome of the write goes to `reply` when one is given.
    Send {
        command: OutboundCommand,
        reply: Option<oneshot::Sender<Result<(), ConnectionError>>>,
    },
    /// Switch the active view
    Show(View),
}

impl UserAction {
    /// A send whose outcome is delivered on the returned receiver
    pub fn send(command: OutboundCommand) -> (Self, oneshot::Receiver<Result<(), ConnectionError>>) {
        let (tx, rx) = oneshot::channel();
        (
            Self::Send {
                command,
                reply: Some(tx),
            },
            rx,
        )
    }
}

/// Drives the connection and the UI from a single task
pub struct ClientRuntime<C, R> {
    manager: ConnectionManager<C>,
    dispatcher: MessageDispatcher<R>,
    notices: NoticeReceiver,
    liveness_interval: Duration,
}

impl<C: Connector, R: Renderer> ClientRuntime<C, R> {
    pub fn new(config: &ClientConfig, connector: C, renderer: R) -> Self {
        let (manager, notices) = ConnectionManager::new(config, connector);
        Self {
            manager,
            dispatcher: MessageDispatcher::new(renderer),
            notices,
            liveness_interval: config.liveness_interval,
        }
    }

    pub fn manager(&self) -> &ConnectionManager<C> {
        &self.manager
    }

    pub fn dispatcher(&self) -> &MessageDispatcher<R> {
        &self.dispatcher
    }

    /// Run until cancelled, until `actions` closes, or until the scanner is
    /// given up on.
    ///
    /// The socket is closed on every exit path. Only an exhausted retry
    /// budget is reported as an error.
    pub async fn run(
        &mut self,
        mut actions: mpsc::Receiver<UserAction>,
        cancel: CancellationToken,
    ) -> Result<(), ConnectionError> {
        self.dispatcher.show(View::Home);
        self.manager.connect();

        let mut liveness = tokio::time::interval_at(
            Instant::now() + self.liveness_interval,
            self.liveness_interval,
        );
        liveness.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let result = loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::info!("Client shutting down");
                    break Ok(());
                }

                _ = liveness.tick() => {
                    match self.manager.check_liveness() {
                        Ok(Liveness::Alive) => {}
                        Ok(Liveness::Reconnecting { attempt }) => {
                            tracing::debug!(attempt, "Liveness check reopened the socket");
                        }
                        Err(e) => break Err(e),
                    }
                }

                Some(notice) = self.notices.recv() => {
                    match self.manager.handle_notice(notice) {
                        Some(Incoming::Link(link)) => self.dispatcher.on_link(link),
                        Some(Incoming::Event(event)) => {
                            self.dispatcher.dispatch(event);
                        }
                        None => {}
                    }
                }

                action = actions.recv() => match action {
                    Some(action) => self.handle_action(action),
                    None => {
                        tracing::debug!("Action channel closed");
                        break Ok(());
                    }
                },
            }
        };

        self.manager.shutdown();
        result
    }

    fn handle_action(&mut self, action: UserAction) {
        match action {
            UserAction::Send { command, reply } => {
                let outcome = self.manager.send(&command);
                if let Err(e) = &outcome {
                    tracing::warn!("Command '{}' not sent: {}", command.action(), e);
                }
                if let Some(reply) = reply {
                    let _ = reply.send(outcome);
                }
            }
            UserAction::Show(view) => self.dispatcher.show(view),
        }
    }
}
