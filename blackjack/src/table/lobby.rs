//! The connection lifecycle manager.
//!
//! [`Lobby`] is the single owner of the [`Registry`]. Every arrival,
//! departure and chip adjustment is a message in its inbox, handled one
//! at a time, so nothing else ever races on who is seated. Broadcasts go
//! through here too: a failed send is that connection's death and gets
//! it unregistered on the spot.

use log::{debug, info};
use std::collections::HashSet;
use tokio::sync::{mpsc, oneshot, watch};

use super::{
    config::TableConfig, errors::TableError, messages::LobbyMessage, registry::Participant,
    registry::Registry,
};
use crate::{
    game::{
        TableEvent,
        entities::{Chips, Username},
    },
    net::link::{ConnectionId, Link},
};

/// Lobby handle for sending messages
#[derive(Clone, Debug)]
pub struct LobbyHandle {
    sender: mpsc::UnboundedSender<LobbyMessage>,
    seated: watch::Receiver<usize>,
}

impl LobbyHandle {
    fn send(&self, message: LobbyMessage) -> Result<(), TableError> {
        self.sender.send(message).map_err(|_| TableError::Closed)
    }

    async fn ask<T>(
        &self,
        message: impl FnOnce(oneshot::Sender<T>) -> LobbyMessage,
    ) -> Result<T, TableError> {
        let (response, receiver) = oneshot::channel();
        self.send(message(response))?;
        receiver.await.map_err(|_| TableError::Closed)
    }

    /// Hand over a fresh connection. The lobby asks it for a name and
    /// seats it once it answers.
    pub fn connect(&self, link: Link) -> Result<(), TableError> {
        self.send(LobbyMessage::Connect { link })
    }

    /// Report a dead connection. Fire and forget; reporting the same
    /// connection more than once is harmless.
    pub fn disconnect(&self, connection: ConnectionId) {
        let _ = self.send(LobbyMessage::Disconnect { connection });
    }

    pub async fn unregister(&self, connection: ConnectionId) -> Result<bool, TableError> {
        self.ask(|response| LobbyMessage::Unregister {
            connection,
            response,
        })
        .await
    }

    pub async fn broadcast(&self, line: impl Into<String>) -> Result<usize, TableError> {
        let line = line.into();
        self.ask(|response| LobbyMessage::Broadcast { line, response })
            .await
    }

    pub async fn seated(&self) -> Result<Vec<Participant>, TableError> {
        self.ask(|response| LobbyMessage::Seated { response }).await
    }

    pub async fn adjust_chips(
        &self,
        connection: ConnectionId,
        delta: Chips,
    ) -> Result<Option<Chips>, TableError> {
        self.ask(|response| LobbyMessage::AdjustChips {
            connection,
            delta,
            response,
        })
        .await
    }

    #[must_use]
    pub fn seated_count(&self) -> usize {
        *self.seated.borrow()
    }

    /// Block until at least `count` participants are seated.
    pub async fn wait_for_players(&self, count: usize) -> Result<usize, TableError> {
        let mut seated = self.seated.clone();
        let n = seated
            .wait_for(|n| *n >= count)
            .await
            .map_err(|_| TableError::Closed)?;
        Ok(*n)
    }
}

pub struct Lobby {
    config: TableConfig,
    registry: Registry,
    /// Connections still answering the name prompt.
    greeting: HashSet<ConnectionId>,
    inbox: mpsc::UnboundedReceiver<LobbyMessage>,
    /// Lets name prompts report back once answered.
    sender: mpsc::UnboundedSender<LobbyMessage>,
    seated: watch::Sender<usize>,
}

impl Lobby {
    #[must_use]
    pub fn new(config: TableConfig) -> (Self, LobbyHandle) {
        let (sender, inbox) = mpsc::unbounded_channel();
        let (seated, seated_rx) = watch::channel(0);
        let lobby = Self {
            config,
            registry: Registry::new(),
            greeting: HashSet::new(),
            inbox,
            sender: sender.clone(),
            seated,
        };
        let handle = LobbyHandle {
            sender,
            seated: seated_rx,
        };
        (lobby, handle)
    }

    /// Run the lobby event loop
    pub async fn run(mut self) {
        info!("lobby open");
        while let Some(message) = self.inbox.recv().await {
            self.handle_message(message);
        }
        info!("lobby closed");
    }

    fn handle_message(&mut self, message: LobbyMessage) {
        match message {
            LobbyMessage::Connect { link } => {
                self.greeting.insert(link.id());
                self.greet(link);
            }

            LobbyMessage::Named { link, name } => self.register(link, name),

            LobbyMessage::Disconnect { connection } => {
                if self.greeting.remove(&connection) {
                    debug!("connection {connection} hung up before giving a name");
                } else {
                    self.unregister(connection);
                }
            }

            LobbyMessage::Unregister {
                connection,
                response,
            } => {
                let removed = self.unregister(connection);
                let _ = response.send(removed);
            }

            LobbyMessage::Broadcast { line, response } => {
                let reached = self.broadcast(&line);
                let _ = response.send(reached);
            }

            LobbyMessage::Seated { response } => {
                let _ = response.send(self.registry.participants());
            }

            LobbyMessage::AdjustChips {
                connection,
                delta,
                response,
            } => {
                let _ = response.send(self.registry.adjust_chips(connection, delta));
            }
        }
    }

    /// Ask a new connection for its name without holding up the inbox.
    fn greet(&self, link: Link) {
        let sender = self.sender.clone();
        tokio::spawn(async move {
            match link.ask_name().await {
                Ok(name) => {
                    let _ = sender.send(LobbyMessage::Named { link, name });
                }
                Err(error) => {
                    debug!("connection {} left before sitting down: {error}", link.id());
                    let _ = sender.send(LobbyMessage::Disconnect {
                        connection: link.id(),
                    });
                }
            }
        });
    }

    /// Seat a connection that answered the name prompt, unless it hung
    /// up in the meantime.
    fn register(&mut self, link: Link, name: Username) {
        let connection = link.id();
        if !self.greeting.remove(&connection) {
            debug!("connection {connection} is gone; not seating {name}");
            return;
        }
        let participant = self
            .registry
            .register(link, name, self.config.starting_chips);
        info!(
            "seated player #{} {} on connection {connection} with {} chips",
            participant.id, participant.name, participant.chips
        );
        self.publish_count();
        self.broadcast(&TableEvent::Joined(participant.name).to_string());
    }

    fn unregister(&mut self, connection: ConnectionId) -> bool {
        let Some(participant) = self.registry.unregister(connection) else {
            return false;
        };
        info!("player #{} {} left", participant.id, participant.name);
        self.publish_count();
        self.broadcast(&TableEvent::Left(participant.name).to_string());
        true
    }

    fn publish_count(&self) {
        self.seated.send_replace(self.registry.len());
    }

    /// Queue `line` for every seated connection. Connections whose
    /// outbox is closed are unregistered, which is itself announced.
    fn broadcast(&mut self, line: &str) -> usize {
        let mut dead = Vec::new();
        let mut reached = 0;
        for participant in self.registry.iter() {
            match participant.link.send(line) {
                Ok(()) => reached += 1,
                Err(_) => dead.push(participant.connection()),
            }
        }
        debug!("message broadcast to {reached} player(s): {line}");
        for connection in dead {
            self.unregister(connection);
        }
        reached
    }
}
