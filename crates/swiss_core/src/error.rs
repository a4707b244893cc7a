//! Errors raised synchronously by the pairing engine.
//!
//! Only requests that cannot be paired at all are errors. A round that pairs
//! with compromises is reported through `RoundPairing` instead.

use thiserror::Error;

use crate::types::PlayerId;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("at least two active players are needed to pair a round, found {found}")]
    NotEnoughPlayers { found: usize },

    #[error("round {round} is outside the tournament's 1..={total} rounds")]
    RoundOutOfRange { round: u32, total: u32 },

    #[error("player id {0} appears more than once in the snapshot")]
    DuplicatePlayer(PlayerId),
}
