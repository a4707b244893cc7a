//! Errors of the round lifecycle

use std::path::PathBuf;

use swiss_core::{GameResult, PlayerId, ValidationError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TournamentError {
    #[error(transparent)]
    Pairing(#[from] ValidationError),

    #[error("round {round} still has {pending} game(s) without a result")]
    RoundIncomplete { round: u32, pending: usize },

    #[error("all {total} rounds have already been paired")]
    AllRoundsPaired { total: u32 },

    #[error("no round has been paired yet")]
    NoActiveRound,

    #[error("registration is closed once round 1 is paired; admit a late entry instead")]
    RegistrationClosed,

    #[error("unknown player id {0}")]
    UnknownPlayer(PlayerId),

    #[error("player {0} has already withdrawn")]
    PlayerInactive(PlayerId),

    #[error("round {round} has no board {board}")]
    UnknownBoard { round: u32, board: u32 },

    #[error("board {board} of round {round} already has a result")]
    AlreadyRecorded { round: u32, board: u32 },

    #[error("result {result:?} cannot be entered for board {board}")]
    InvalidResult { board: u32, result: GameResult },

    #[error("failed to read {path:?}: {source}")]
    Read {
        #[source]
        source: std::io::Error,
        path: PathBuf,
    },

    #[error("failed to write {path:?}: {source}")]
    Write {
        #[source]
        source: std::io::Error,
        path: PathBuf,
    },

    #[error("failed to parse tournament state {path:?}: {source}")]
    ParseState {
        #[source]
        source: serde_json::Error,
        path: PathBuf,
    },

    #[error("failed to serialize tournament state: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("failed to parse config {path:?}: {source}")]
    ParseConfig {
        #[source]
        source: toml::de::Error,
        path: PathBuf,
    },

    #[error("invalid configuration: {field} {reason}")]
    InvalidConfig { field: &'static str, reason: String },
}

pub(crate) type Result<T> = std::result::Result<T, TournamentError>;
