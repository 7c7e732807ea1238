//! Networking layer.
//!
//! Clients speak a plain line-based text protocol over TCP. The server
//! runs on tokio; the bundled client is blocking.

/// Blocking TCP client for connecting to a blackjack server.
pub mod client;

/// Connection and server error types.
pub mod errors;

/// Channel-backed connection endpoints.
pub mod link;

/// Prompts and reply parsing.
pub mod messages;

/// TCP listener and per-connection tasks.
pub mod server;

/// Line framing helpers.
pub mod utils;
