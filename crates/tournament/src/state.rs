//! Tournament state: players, rounds and results
//!
//! The tournament owns every player record. Pairing gets an immutable view
//! of them; whatever the round derives (floats, the BYE, results) is applied
//! here afterwards.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use swiss_core::{
    record_float, rank_order, Color, DutchEngine, Game, GameResult, PairingStrategy, Player,
    PlayerId, QualityViolation, Score, SearchTier,
};
use tracing::{info, warn};

use crate::config::TournamentConfig;
use crate::error::{Result, TournamentError};

/// One paired round
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Round {
    pub number: u32,
    pub started_at: DateTime<Utc>,
    /// Name of the pairing strategy that produced the round
    pub strategy: String,
    pub method: SearchTier,
    pub games: Vec<Game>,
    #[serde(default)]
    pub unpaired: Vec<PlayerId>,
    #[serde(default)]
    pub violations: Vec<QualityViolation>,
    /// Check-in times for this round
    #[serde(default)]
    pub arrivals: BTreeMap<PlayerId, DateTime<Utc>>,
}

impl Round {
    /// Every game has a result.
    pub fn is_complete(&self) -> bool {
        self.games.iter().all(|g| g.is_completed())
    }

    pub fn pending(&self) -> impl Iterator<Item = &Game> + '_ {
        self.games.iter().filter(|g| !g.is_completed())
    }

    pub fn game(&self, board: u32) -> Option<&Game> {
        self.games.iter().find(|g| g.board == board)
    }

    pub fn game_of(&self, player: PlayerId) -> Option<&Game> {
        self.games.iter().find(|g| g.involves(player))
    }
}

/// A Swiss tournament in progress
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tournament {
    pub config: TournamentConfig,
    pub players: Vec<Player>,
    pub rounds: Vec<Round>,
}

impl Tournament {
    pub fn new(config: TournamentConfig) -> Self {
        Self {
            config,
            players: Vec::new(),
            rounds: Vec::new(),
        }
    }

    // =========================================================================
    // Players
    // =========================================================================

    /// Register a player before round 1. Seeds are recomputed from ratings
    /// (highest first, unrated last, then registration order).
    pub fn register(&mut self, name: &str, rating: Option<u32>) -> Result<PlayerId> {
        if !self.rounds.is_empty() {
            return Err(TournamentError::RegistrationClosed);
        }
        let id = self.next_player_id();
        let mut player = Player::new(id, name, id);
        player.rating = rating;
        self.players.push(player);
        self.reseed();
        Ok(id)
    }

    fn next_player_id(&self) -> PlayerId {
        self.players.iter().map(|p| p.id).max().unwrap_or(0) + 1
    }

    fn reseed(&mut self) {
        let mut order: Vec<(Option<u32>, PlayerId)> =
            self.players.iter().map(|p| (p.rating, p.id)).collect();
        order.sort_by(|a, b| b.0.cmp(&a.0).then_with(|| a.1.cmp(&b.1)));
        for (seed, (_, id)) in order.iter().enumerate() {
            if let Some(p) = self.players.iter_mut().find(|p| p.id == *id) {
                p.seed = seed as u32 + 1;
            }
        }
    }

    pub fn player(&self, id: PlayerId) -> Result<&Player> {
        self.players
            .iter()
            .find(|p| p.id == id)
            .ok_or(TournamentError::UnknownPlayer(id))
    }

    pub(crate) fn player_mut(&mut self, id: PlayerId) -> Result<&mut Player> {
        self.players
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(TournamentError::UnknownPlayer(id))
    }

    pub fn active_players(&self) -> impl Iterator<Item = &Player> + '_ {
        self.players.iter().filter(|p| p.active)
    }

    // =========================================================================
    // Rounds
    // =========================================================================

    pub fn current_round(&self) -> Option<&Round> {
        self.rounds.last()
    }

    pub(crate) fn current_round_mut(&mut self) -> Result<&mut Round> {
        self.rounds.last_mut().ok_or(TournamentError::NoActiveRound)
    }

    /// Every round is paired and every game has a result.
    pub fn is_finished(&self) -> bool {
        self.rounds.len() as u32 >= self.config.total_rounds
            && self.rounds.iter().all(Round::is_complete)
    }

    /// Pair the next round with the Dutch engine.
    pub fn pair_next_round(&mut self, now: DateTime<Utc>) -> Result<&Round> {
        let engine = DutchEngine::new(self.config.pairing.clone());
        self.pair_next_round_with(&engine, now)
    }

    /// Pair the next round with any strategy.
    ///
    /// Refused while the current round still has games without a result, or
    /// once every announced round is paired.
    pub fn pair_next_round_with(
        &mut self,
        strategy: &dyn PairingStrategy,
        now: DateTime<Utc>,
    ) -> Result<&Round> {
        if let Some(current) = self.current_round() {
            let pending = current.pending().count();
            if pending > 0 {
                return Err(TournamentError::RoundIncomplete {
                    round: current.number,
                    pending,
                });
            }
        }
        let total = self.config.total_rounds;
        let number = self.rounds.len() as u32 + 1;
        if number > total {
            return Err(TournamentError::AllRoundsPaired { total });
        }

        let pairing = strategy.pair_round(&self.players, number, total)?;

        for record in &pairing.floats {
            record_float(self.player_mut(record.player)?, *record);
        }
        if let Some(id) = pairing.bye {
            let points = self.config.bye_points;
            let player = self.player_mut(id)?;
            player.score += points;
            player.byes += 1;
            player.colors.push(None);
        }
        for &id in &pairing.unpaired {
            self.player_mut(id)?.colors.push(None);
        }
        if !pairing.success {
            warn!(round = number, unpaired = ?pairing.unpaired, "round paired incompletely");
        }
        info!(
            round = number,
            strategy = strategy.name(),
            games = pairing.games.len(),
            method = ?pairing.method,
            "round started"
        );

        self.rounds.push(Round {
            number,
            started_at: now,
            strategy: strategy.name().to_string(),
            method: pairing.method,
            games: pairing.games,
            unpaired: pairing.unpaired,
            violations: pairing.violations,
            arrivals: BTreeMap::new(),
        });
        self.current_round().ok_or(TournamentError::NoActiveRound)
    }

    // =========================================================================
    // Results
    // =========================================================================

    /// Enter the result of a board in the current round.
    pub fn record_result(&mut self, board: u32, result: GameResult) -> Result<()> {
        if result == GameResult::Bye {
            return Err(TournamentError::InvalidResult { board, result });
        }
        let round = self.current_round_mut()?;
        let number = round.number;
        let game = round
            .games
            .iter_mut()
            .find(|g| g.board == board)
            .ok_or(TournamentError::UnknownBoard {
                round: number,
                board,
            })?;
        if game.is_completed() {
            return Err(TournamentError::AlreadyRecorded {
                round: number,
                board,
            });
        }
        if game.is_bye() {
            return Err(TournamentError::InvalidResult { board, result });
        }
        game.result = Some(result);
        let game = game.clone();
        self.apply_result(&game, result)?;
        info!(round = number, board, result = result.notation(), "result recorded");
        Ok(())
    }

    /// Credit a finished game to both players.
    pub(crate) fn apply_result(&mut self, game: &Game, result: GameResult) -> Result<()> {
        let white = game.white;
        let Some(black) = game.black else {
            return Ok(());
        };
        let forfeit = self.config.forfeit_points;

        let (white_points, black_points) = match result {
            GameResult::WhiteWins => (Score::ONE, Score::ZERO),
            GameResult::BlackWins => (Score::ZERO, Score::ONE),
            GameResult::Draw => (Score::HALF, Score::HALF),
            GameResult::WhiteWinsForfeit => (forfeit, Score::ZERO),
            GameResult::BlackWinsForfeit => (Score::ZERO, forfeit),
            GameResult::DoubleForfeit | GameResult::Bye => (Score::ZERO, Score::ZERO),
        };

        for (id, opponent, color, points) in [
            (white, black, Color::White, white_points),
            (black, white, Color::Black, black_points),
        ] {
            let player = self.player_mut(id)?;
            player.score += points;
            player.games_played += 1;
            if result.is_played() {
                player.opponents.insert(opponent);
                player.colors.push(Some(color));
            } else {
                // Forfeits count as a game without a color or an opponent
                player.colors.push(None);
            }
        }

        match result {
            GameResult::WhiteWinsForfeit => self.player_mut(white)?.forfeit_wins += 1,
            GameResult::BlackWinsForfeit => self.player_mut(black)?.forfeit_wins += 1,
            _ => {}
        }
        Ok(())
    }

    /// Players in standings order: score, then rating, then seed.
    pub fn ranked_players(&self) -> Vec<&Player> {
        let mut ranked: Vec<&Player> = self.players.iter().collect();
        ranked.sort_by(|a, b| rank_order(a, b));
        ranked
    }
}

#[cfg(test)]
#[path = "state_tests.rs"]
mod state_tests;
