//! Simulated events: play a whole tournament with rating-driven random results

use chrono::{DateTime, Duration, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use swiss_core::GameResult;
use tracing::info;

use crate::config::TournamentConfig;
use crate::error::Result;
use crate::state::Tournament;

/// Share of games that end in a draw
pub const DRAW_RATE: f64 = 0.2;

/// Lowest and highest rating handed to simulated players
pub const RATING_RANGE: (u32, u32) = (1200, 2400);

/// Expected score of a player rated `rating_a` against one rated `rating_b`
pub fn expected_score(rating_a: u32, rating_b: u32) -> f64 {
    let diff = rating_b as f64 - rating_a as f64;
    1.0 / (1.0 + 10.0_f64.powf(diff / 400.0))
}

/// Draw a result for a game between two rated players.
pub fn random_result(rng: &mut impl Rng, white: u32, black: u32) -> GameResult {
    if rng.gen_bool(DRAW_RATE) {
        return GameResult::Draw;
    }
    if rng.gen_bool(expected_score(white, black).clamp(0.0, 1.0)) {
        GameResult::WhiteWins
    } else {
        GameResult::BlackWins
    }
}

/// Register `players` random entrants and play every round.
///
/// Same `seed`, same tournament.
pub fn simulate(
    config: TournamentConfig,
    players: u32,
    seed: u64,
    start: DateTime<Utc>,
) -> Result<Tournament> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut tournament = Tournament::new(config);
    for i in 1..=players {
        let rating = rng.gen_range(RATING_RANGE.0..=RATING_RANGE.1);
        tournament.register(&format!("Player {i}"), Some(rating))?;
    }

    for round in 0..tournament.config.total_rounds {
        let now = start + Duration::hours(round as i64);
        let pending: Vec<(u32, u32, u32)> = {
            let paired = tournament.pair_next_round(now)?;
            paired
                .pending()
                .filter_map(|g| g.black.map(|black| (g.board, g.white, black)))
                .collect()
        };
        for (board, white, black) in pending {
            let rating = |id| {
                tournament
                    .player(id)
                    .ok()
                    .and_then(|p| p.rating)
                    .unwrap_or(RATING_RANGE.0)
            };
            let result = random_result(&mut rng, rating(white), rating(black));
            tournament.record_result(board, result)?;
        }
        info!(round = round + 1, "simulated round finished");
    }
    Ok(tournament)
}
