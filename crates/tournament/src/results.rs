//! Standings, reports and tournament state storage

use std::path::Path;

use serde::{Deserialize, Serialize};
use swiss_core::{PlayerId, Score};

use crate::error::{Result, TournamentError};
use crate::state::Tournament;

/// One line of the standings table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Standing {
    pub rank: usize,
    pub id: PlayerId,
    pub name: String,
    pub score: Score,
    pub rating: Option<u32>,
    pub games_played: u32,
    pub byes: u32,
    pub active: bool,
}

impl Tournament {
    /// Standings ordered by score, then rating, then seed.
    pub fn standings(&self) -> Vec<Standing> {
        self.ranked_players()
            .into_iter()
            .enumerate()
            .map(|(i, p)| Standing {
                rank: i + 1,
                id: p.id,
                name: p.name.clone(),
                score: p.score,
                rating: p.rating,
                games_played: p.games_played,
                byes: p.byes,
                active: p.active,
            })
            .collect()
    }

    /// Save state to a JSON file
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json).map_err(|source| TournamentError::Write {
            source,
            path: path.to_path_buf(),
        })
    }

    /// Load state from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|source| TournamentError::Read {
            source,
            path: path.to_path_buf(),
        })?;
        serde_json::from_str(&contents).map_err(|source| TournamentError::ParseState {
            source,
            path: path.to_path_buf(),
        })
    }

    /// Generate a text report: standings, then the current round
    pub fn generate_report(&self) -> String {
        let mut report = String::new();
        report.push_str(&format!("=== Tournament: {} ===\n\n", self.config.name));
        report.push_str(&format!(
            "Rounds: {}/{}, players: {} ({} active)\n\n",
            self.rounds.len(),
            self.config.total_rounds,
            self.players.len(),
            self.active_players().count()
        ));

        report.push_str("Standings:\n");
        report.push_str(&format!(
            "{:>4} {:<24} {:>6} {:>6} {:>5} {:>4}\n",
            "#", "Player", "Rating", "Score", "Games", "Byes"
        ));
        report.push_str(&"-".repeat(54));
        report.push('\n');
        for s in self.standings() {
            let rating = s.rating.map(|r| r.to_string()).unwrap_or_else(|| "-".to_string());
            let name = if s.active {
                s.name.clone()
            } else {
                format!("{} (withdrawn)", s.name)
            };
            report.push_str(&format!(
                "{:>4} {:<24} {:>6} {:>6} {:>5} {:>4}\n",
                s.rank,
                name,
                rating,
                s.score.to_string(),
                s.games_played,
                s.byes
            ));
        }

        if let Some(round) = self.current_round() {
            report.push_str(&format!(
                "\nRound {} ({:?}, started {}):\n",
                round.number,
                round.method,
                round.started_at.format("%Y-%m-%d %H:%M")
            ));
            let name = |id: PlayerId| {
                self.player(id)
                    .map(|p| p.name.clone())
                    .unwrap_or_else(|_| format!("#{id}"))
            };
            for game in &round.games {
                let result = game.result.map(|r| r.notation()).unwrap_or("*");
                match game.black {
                    Some(black) => report.push_str(&format!(
                        "{:>4} {:<24} {:^5} {:<24}\n",
                        game.board,
                        name(game.white),
                        result,
                        name(black)
                    )),
                    None => report.push_str(&format!(
                        "{:>4} {:<24} {:^5}\n",
                        game.board,
                        name(game.white),
                        result
                    )),
                }
            }
            for &id in &round.unpaired {
                report.push_str(&format!("     {} (unpaired)\n", name(id)));
            }
        }

        report
    }

    /// Print report to stdout
    pub fn print_report(&self) {
        println!("{}", self.generate_report());
    }
}
