//! Check-in, no-shows, withdrawals and late entries

use chrono::{DateTime, Utc};
use swiss_core::{GameResult, LateEntry, Player, PlayerId};
use tracing::{info, warn};

use crate::error::{Result, TournamentError};
use crate::state::Tournament;

impl Tournament {
    /// Note that a player has arrived for the current round.
    pub fn check_in(&mut self, player: PlayerId, at: DateTime<Utc>) -> Result<()> {
        self.player(player)?;
        let round = self.current_round_mut()?;
        round.arrivals.entry(player).or_insert(at);
        Ok(())
    }

    /// Forfeit every pending game whose players did not check in within the
    /// default time. Returns the boards that were decided.
    ///
    /// Nothing happens before the default time has run out.
    pub fn resolve_no_shows(&mut self, now: DateTime<Utc>) -> Result<Vec<u32>> {
        let default_time = self.config.default_time();
        let round = self.current_round_mut()?;
        let deadline = round.started_at + default_time;
        if now < deadline {
            return Ok(Vec::new());
        }

        let arrived = |id: PlayerId| round.arrivals.get(&id).is_some_and(|t| *t <= deadline);
        let mut decided = Vec::new();
        for game in round.pending() {
            let Some(black) = game.black else {
                continue;
            };
            let result = match (arrived(game.white), arrived(black)) {
                (true, true) => continue,
                (true, false) => GameResult::WhiteWinsForfeit,
                (false, true) => GameResult::BlackWinsForfeit,
                (false, false) => GameResult::DoubleForfeit,
            };
            decided.push((game.board, result));
        }

        let number = round.number;
        for &(board, result) in &decided {
            warn!(round = number, board, result = result.notation(), "no-show forfeited");
            self.record_result(board, result)?;
        }
        Ok(decided.into_iter().map(|(board, _)| board).collect())
    }

    /// Withdraw a player. A game of theirs still waiting for a result in the
    /// current round is won by forfeit by the opponent.
    pub fn withdraw(&mut self, id: PlayerId) -> Result<()> {
        let player = self.player_mut(id)?;
        if !player.active {
            return Err(TournamentError::PlayerInactive(id));
        }
        player.active = false;

        let pending = self
            .current_round()
            .and_then(|r| r.pending().find(|g| g.involves(id)))
            .map(|g| {
                let result = if g.white == id {
                    GameResult::BlackWinsForfeit
                } else {
                    GameResult::WhiteWinsForfeit
                };
                (g.board, result)
            });
        if let Some((board, result)) = pending {
            self.record_result(board, result)?;
        }
        info!(player = id, forfeited = pending.is_some(), "player withdrawn");
        Ok(())
    }

    /// Admit a player after round 1 has been paired.
    ///
    /// The entrant gets a temporary seeding number from their rating; every
    /// player seeded at or below it moves down one place. Histories start
    /// empty, and each round already paired is recorded as missed and, if
    /// configured, credited with `missed_round_points`.
    pub fn admit_late_entry(&mut self, name: &str, rating: Option<u32>) -> Result<PlayerId> {
        if self.rounds.is_empty() {
            return self.register(name, rating);
        }

        let seed = temporary_seed(&self.players, rating);
        for p in self.players.iter_mut().filter(|p| p.seed >= seed) {
            p.seed += 1;
        }

        let missed = self.rounds.len() as u32;
        let id = self.players.iter().map(|p| p.id).max().unwrap_or(0) + 1;
        let mut player = Player::new(id, name, seed);
        player.rating = rating;
        player.score = self.config.missed_round_points.times(missed);
        player.late_entry = Some(LateEntry {
            joined_round: missed + 1,
            missed_rounds: missed,
        });
        self.players.push(player);
        info!(player = id, seed, missed, "late entry admitted");
        Ok(id)
    }
}

/// Seeding position a newcomer with `rating` takes: after every player rated
/// at least as high, before everyone rated lower and every unrated player.
/// Unrated entrants go last.
fn temporary_seed(players: &[Player], rating: Option<u32>) -> u32 {
    let last = players.iter().map(|p| p.seed).max().unwrap_or(0) + 1;
    let Some(rating) = rating else {
        return last;
    };
    players
        .iter()
        .filter(|p| p.rating.map_or(true, |r| r < rating))
        .map(|p| p.seed)
        .min()
        .unwrap_or(last)
}

#[cfg(test)]
#[path = "lifecycle_tests.rs"]
mod lifecycle_tests;
