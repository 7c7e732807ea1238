//! Who is currently seated.

use std::collections::HashMap;

use crate::{
    game::entities::{Chips, PlayerId, Username},
    net::link::{ConnectionId, Link},
};

#[derive(Clone, Debug)]
pub struct Participant {
    pub id: PlayerId,
    pub name: Username,
    pub chips: Chips,
    pub link: Link,
}

impl Participant {
    #[must_use]
    pub fn connection(&self) -> ConnectionId {
        self.link.id()
    }
}

/// Connection to participant mapping. Exactly one participant per
/// connection. Only the lobby actor ever holds a mutable one.
#[derive(Debug)]
pub struct Registry {
    participants: HashMap<ConnectionId, Participant>,
    next_id: PlayerId,
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl Registry {
    #[must_use]
    pub fn new() -> Self {
        Self {
            participants: HashMap::new(),
            next_id: 1,
        }
    }

    /// Seat a named connection. Registering a connection that's already
    /// seated returns the existing participant untouched.
    pub fn register(&mut self, link: Link, name: Username, chips: Chips) -> Participant {
        if let Some(existing) = self.participants.get(&link.id()) {
            return existing.clone();
        }
        let participant = Participant {
            id: self.next_id,
            name,
            chips,
            link,
        };
        self.next_id += 1;
        self.participants
            .insert(participant.connection(), participant.clone());
        participant
    }

    /// Remove a connection's participant. Unknown connections are a no-op.
    pub fn unregister(&mut self, connection: ConnectionId) -> Option<Participant> {
        self.participants.remove(&connection)
    }

    #[must_use]
    pub fn get(&self, connection: ConnectionId) -> Option<&Participant> {
        self.participants.get(&connection)
    }

    /// Apply a settlement delta, returning the new balance.
    pub fn adjust_chips(&mut self, connection: ConnectionId, delta: Chips) -> Option<Chips> {
        let participant = self.participants.get_mut(&connection)?;
        participant.chips += delta;
        Some(participant.chips)
    }

    /// Everyone seated, in arrival order.
    #[must_use]
    pub fn participants(&self) -> Vec<Participant> {
        let mut participants: Vec<_> = self.participants.values().cloned().collect();
        participants.sort_by_key(|p| p.id);
        participants
    }

    pub fn iter(&self) -> impl Iterator<Item = &Participant> {
        self.participants.values()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.participants.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.participants.is_empty()
    }
}
