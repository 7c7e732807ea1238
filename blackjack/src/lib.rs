//! # Blackjack
//!
//! A multi-player blackjack table served over TCP.
//!
//! Any number of participants connect, pick a name, and share one table
//! and one shoe. Once enough of them are seated, rounds run back to back:
//!
//! - **Betting**: each participant bets between 0 and their balance
//! - **Burn**: one card is discarded
//! - **Deal**: two cards each, the dealer's second concealed
//! - **Player turns**: hit or stay until standing or bust
//! - **Dealer turn**: draw to 17
//! - **Settlement**: wins, losses and pushes; broke players are removed
//!
//! ## Core Modules
//!
//! - [`game`]: cards, the shoe, hand evaluation, and the round state machine
//! - [`table`]: the participant registry, its lobby actor, and the coordinator
//! - [`net`]: the line protocol, TCP server, and client
//!
//! ## Example
//!
//! ```
//! use blackjack::game::{entities::{Card, Rank, Suit}, functional::score};
//!
//! let hand = [Card(Rank::Ace, Suit::Spade), Card(Rank::King, Suit::Heart)];
//! assert_eq!(score(&hand), 21);
//! ```

/// Networking components for client-server communication.
pub mod net;
pub use net::{client::Client, messages, server, utils};

/// Core game logic, entities, and the round state machine.
pub mod game;
pub use game::{
    Round, Shoe, TableEvent,
    constants::{self, DEFAULT_NUM_DECKS, DEFAULT_STARTING_CHIPS},
    entities, functional,
};

/// The shared table: registry, lobby, and game coordinator.
pub mod table;
pub use table::{Coordinator, Lobby, LobbyHandle, TableConfig};
