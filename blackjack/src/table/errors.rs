use thiserror::Error;

use crate::game::RoundError;

#[derive(Debug, Error)]
pub enum TableError {
    #[error("lobby is closed")]
    Closed,

    #[error(transparent)]
    Round(#[from] RoundError),
}
