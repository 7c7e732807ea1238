//! The shared table: who's seated and the loop that deals to them.
//!
//! This module implements:
//! - Registry: connection to participant mapping
//! - Lobby: async actor that is the only writer of the registry
//! - Coordinator: the round loop, driving the game state machine
//!   over each participant's connection
//! - Table configuration
//!
//! ## Architecture
//!
//! The lobby and the coordinator each run in their own Tokio task. The
//! coordinator talks to the lobby through a [`LobbyHandle`] and to
//! participants through their [`crate::net::link::Link`]s.
//!
//! ## Example
//!
//! ```no_run
//! use blackjack::table::{Coordinator, Lobby, TableConfig};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = TableConfig::default();
//!     let (lobby, handle) = Lobby::new(config.clone());
//!     tokio::spawn(lobby.run());
//!
//!     // Hand accepted connections to `handle.connect(link)`.
//!     let _ = Coordinator::new(config, handle).run().await;
//! }
//! ```

pub mod config;
pub mod coordinator;
pub mod errors;
pub mod lobby;
pub mod messages;
pub mod registry;

pub use config::TableConfig;
pub use coordinator::Coordinator;
pub use errors::TableError;
pub use lobby::{Lobby, LobbyHandle};
pub use messages::LobbyMessage;
pub use registry::{Participant, Registry};
