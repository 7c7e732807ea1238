//! A connection endpoint as seen by the table.
//!
//! A [`Link`] is two channels: an outbox of lines headed to the client
//! and an inbox of lines the client sent. The TCP server pumps a socket
//! into and out of these; tests can drive the other end ([`Remote`])
//! directly without any sockets.

use log::debug;
use std::sync::Arc;
use tokio::sync::{Mutex, mpsc};

use super::{
    errors::LinkError,
    messages::{ExpectBet, ExpectName, ExpectTurnChoice, Prompt, Reply, Request, TurnChoice},
};
use crate::game::entities::{Chips, Username};

/// Identifies a connection for as long as it's open.
pub type ConnectionId = u64;

#[derive(Clone, Debug)]
pub struct Link {
    id: ConnectionId,
    outbox: mpsc::UnboundedSender<String>,
    inbox: Arc<Mutex<mpsc::UnboundedReceiver<String>>>,
}

/// The client side of a [`Link`].
#[derive(Debug)]
pub struct Remote {
    /// Lines the client sends.
    pub input: mpsc::UnboundedSender<String>,
    /// Lines the client receives.
    pub output: mpsc::UnboundedReceiver<String>,
}

impl Link {
    #[must_use]
    pub fn new(id: ConnectionId) -> (Self, Remote) {
        let (outbox, output) = mpsc::unbounded_channel();
        let (input, inbox) = mpsc::unbounded_channel();
        let link = Self {
            id,
            outbox,
            inbox: Arc::new(Mutex::new(inbox)),
        };
        (link, Remote { input, output })
    }

    #[must_use]
    pub fn id(&self) -> ConnectionId {
        self.id
    }

    /// Queue a line for the client. Doesn't wait for the write.
    pub fn send(&self, line: impl Into<String>) -> Result<(), LinkError> {
        self.outbox.send(line.into()).map_err(|_| LinkError::Closed)
    }

    /// Wait for the next line from the client. There's no timeout.
    pub async fn recv_line(&self) -> Result<String, LinkError> {
        self.inbox.lock().await.recv().await.ok_or(LinkError::Closed)
    }

    /// Issue `request` and block until the client answers it validly.
    /// Invalid answers are reported back to the client and the prompt
    /// is repeated.
    pub async fn request(&self, request: &Request) -> Result<Reply, LinkError> {
        loop {
            for line in request.lines() {
                self.send(line)?;
            }
            let line = self.recv_line().await?;
            match request.parse(&line) {
                Ok(reply) => return Ok(reply),
                Err(error) => {
                    debug!("connection {}: rejected {request}: {error}", self.id);
                    self.send(format!("incorrect input: {error}"))?;
                }
            }
        }
    }

    pub async fn ask_name(&self) -> Result<Username, LinkError> {
        let request = Request::from(ExpectName);
        match self.request(&request).await? {
            Reply::Name(name) => Ok(name),
            actual => Err(LinkError::UnexpectedReply {
                expected: request,
                actual,
            }),
        }
    }

    pub async fn ask_bet(&self, chips: Chips) -> Result<Chips, LinkError> {
        let request = Request::from(ExpectBet { chips });
        match self.request(&request).await? {
            Reply::Bet(bet) => Ok(bet),
            actual => Err(LinkError::UnexpectedReply {
                expected: request,
                actual,
            }),
        }
    }

    pub async fn ask_turn(&self) -> Result<TurnChoice, LinkError> {
        let request = Request::from(ExpectTurnChoice);
        match self.request(&request).await? {
            Reply::Choice(choice) => Ok(choice),
            actual => Err(LinkError::UnexpectedReply {
                expected: request,
                actual,
            }),
        }
    }
}
