//! Connection error types.

use thiserror::Error;

use super::messages::{Reply, Request};

/// Anything that goes wrong talking to one connection. All of these
/// mean the connection is as good as gone.
#[derive(Debug, Error, Eq, PartialEq)]
pub enum LinkError {
    #[error("connection closed")]
    Closed,

    #[error("expected a {expected} reply, got {actual:?}")]
    UnexpectedReply { expected: Request, actual: Reply },
}

/// Listener-level failures. These are fatal to the server.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("failed to bind: {0}")]
    Bind(#[source] std::io::Error),

    #[error("failed to accept a connection: {0}")]
    Accept(#[source] std::io::Error),

    #[error("invalid table configuration: {0}")]
    Config(String),

    #[error("lobby shut down")]
    LobbyClosed,
}
