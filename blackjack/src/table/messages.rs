//! Lobby actor message types.

use tokio::sync::oneshot;

use super::registry::Participant;
use crate::{
    game::entities::{Chips, Username},
    net::link::{ConnectionId, Link},
};

/// Messages that can be sent to the [`super::Lobby`]
#[derive(Debug)]
pub enum LobbyMessage {
    /// A socket was accepted and needs a name before it can be seated
    Connect { link: Link },

    /// A new connection answered the name prompt
    Named { link: Link, name: Username },

    /// A connection hung up or failed a write
    Disconnect { connection: ConnectionId },

    /// Remove a participant, reporting whether they were seated
    Unregister {
        connection: ConnectionId,
        response: oneshot::Sender<bool>,
    },

    /// Send a line to everyone seated, reporting how many it reached
    Broadcast {
        line: String,
        response: oneshot::Sender<usize>,
    },

    /// Snapshot of everyone seated, in arrival order
    Seated {
        response: oneshot::Sender<Vec<Participant>>,
    },

    /// Apply a chip delta, reporting the new balance if still seated
    AdjustChips {
        connection: ConnectionId,
        delta: Chips,
        response: oneshot::Sender<Option<Chips>>,
    },
}
