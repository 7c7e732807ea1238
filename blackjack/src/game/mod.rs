//! Blackjack game engine: cards, the shoe, hand evaluation and the
//! round state machine.
//!
//! Nothing in here touches the network. The round state machine is
//! driven by [`crate::table::Coordinator`].

pub mod constants;
pub mod entities;
pub mod events;
pub mod functional;
pub mod round;
pub mod shoe;

pub use events::TableEvent;
pub use round::{Outcome, Phase, Round, RoundError, Settlement, Standing, TurnState};
pub use shoe::{Shoe, ShoeError};
