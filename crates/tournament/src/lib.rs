//! Swiss tournament runner
//!
//! This crate provides the round lifecycle around the `swiss_core` pairing
//! engine:
//! - Registering players and seeding them by rating
//! - Pairing rounds in sequence and recording results
//! - Check-in, no-show forfeits, withdrawals and late entries
//! - Standings, text reports and JSON state files
//!
//! # Usage
//!
//! ```bash
//! # Start an event and pair the first round
//! cargo run -p tournament -- new --config tournament.toml --player "Ann:2210" --player "Bob:2105"
//! cargo run -p tournament -- pair
//!
//! # Enter a result on board 1
//! cargo run -p tournament -- result 1 1-0
//! ```

mod config;
mod error;
mod lifecycle;
mod results;
mod simulate;
mod state;

pub use config::*;
pub use error::TournamentError;
pub use results::*;
pub use simulate::*;
pub use state::*;
