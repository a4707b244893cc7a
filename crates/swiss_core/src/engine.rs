//! The Dutch pairing engine.
//!
//! Round 1 pairs the seeding list top half against bottom half. Later rounds
//! pick the BYE first when the field is odd, then pair score brackets from the
//! top down, floating whoever a bracket cannot pair into the next one. Leftovers
//! at the bottom are handled by reopening the lowest pairs and pairing them
//! again together with the leftovers.
//!
//! The engine reads an immutable snapshot of the players and returns
//! everything the round derives (games, floats, diagnostics). It never
//! modifies a player.

use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::bracket::{pair_bracket, Bracket, SearchTier};
use crate::bye::bye_candidates;
use crate::color::{assign_colors, color_issues, color_preference, ColorIssue, Strength};
use crate::config::PairingConfig;
use crate::error::ValidationError;
use crate::floats::{floats_for_pair, previous_float, FloatRecord};
use crate::score::{group_by_score, outranks, rank_order};
use crate::types::{Color, FloatDirection, Game, Pair, Player, PlayerId, Score};
use crate::PairingStrategy;

/// A compromise the round had to accept. Never an absolute rule: those are
/// never broken.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum QualityViolation {
    /// A strong or absolute color preference was not granted
    ColorOverride { player: PlayerId, strength: Strength },
    /// The allocated color breaks the balance or repeat rule
    ColorRule { player: PlayerId, issue: ColorIssue },
    /// The player floats the same way as in the previous round
    FloatRepeat {
        player: PlayerId,
        direction: FloatDirection,
    },
    /// No legal opponent could be found
    Unpaired { player: PlayerId },
}

/// Everything one round's pairing produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundPairing {
    pub round: u32,
    /// Every active player has a game or the BYE
    pub success: bool,
    /// Highest search tier any bracket needed
    pub method: SearchTier,
    /// Ordered by board; the BYE, if any, is last
    pub games: Vec<Game>,
    pub bye: Option<PlayerId>,
    pub unpaired: Vec<PlayerId>,
    pub floats: Vec<FloatRecord>,
    pub violations: Vec<QualityViolation>,
    pub candidates_examined: u64,
}

impl RoundPairing {
    /// Pairs of the round without the BYE.
    pub fn pairs(&self) -> impl Iterator<Item = Pair> + '_ {
        self.games.iter().filter_map(|g| {
            g.black.map(|black| Pair {
                white: g.white,
                black,
            })
        })
    }

    pub fn game_of(&self, player: PlayerId) -> Option<&Game> {
        self.games.iter().find(|g| g.involves(player))
    }
}

/// Pairs and leftovers of the bracket pass, before colors and boards.
#[derive(Debug, Clone)]
struct Plan {
    /// Higher-ranked player first, top bracket first
    pairs: Vec<(PlayerId, PlayerId)>,
    unpaired: Vec<PlayerId>,
    method: SearchTier,
    examined: u64,
}

/// FIDE Dutch system pairing.
#[derive(Debug, Clone, Default)]
pub struct DutchEngine {
    config: PairingConfig,
}

impl DutchEngine {
    pub fn new(config: PairingConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PairingConfig {
        &self.config
    }

    /// Pair round `round` of `total_rounds`.
    ///
    /// Inactive players in `players` are ignored. Only malformed requests are
    /// errors; a round that cannot pair everybody still comes back, with
    /// `success == false` and the leftovers listed.
    pub fn pair_round(
        &self,
        players: &[Player],
        round: u32,
        total_rounds: u32,
    ) -> Result<RoundPairing, ValidationError> {
        if round == 0 || round > total_rounds {
            return Err(ValidationError::RoundOutOfRange {
                round,
                total: total_rounds,
            });
        }
        let mut seen = BTreeSet::new();
        if let Some(dup) = players.iter().find(|p| !seen.insert(p.id)) {
            return Err(ValidationError::DuplicatePlayer(dup.id));
        }
        let active: Vec<&Player> = players.iter().filter(|p| p.active).collect();
        if active.len() < 2 {
            return Err(ValidationError::NotEnoughPlayers {
                found: active.len(),
            });
        }

        let pairing = if round == 1 {
            self.pair_first_round(&active)
        } else {
            self.pair_later_round(&active, round)
        };

        info!(
            round,
            players = active.len(),
            games = pairing.games.len(),
            method = ?pairing.method,
            examined = pairing.candidates_examined,
            success = pairing.success,
            "round paired"
        );
        if !pairing.success {
            warn!(round, unpaired = ?pairing.unpaired, "players left without a game");
        }
        Ok(pairing)
    }

    // =========================================================================
    // Round 1
    // =========================================================================

    fn pair_first_round(&self, active: &[&Player]) -> RoundPairing {
        let mut ranked: Vec<&Player> = active.to_vec();
        ranked.sort_by_key(|p| (p.seed, p.id));
        let bye = if ranked.len() % 2 == 1 {
            ranked.pop()
        } else {
            None
        };

        let half = ranked.len() / 2;
        let upper_color = self.config.initial_color;
        let mut games: Vec<Game> = (0..half)
            .map(|i| {
                let (top, bottom) = (ranked[i].id, ranked[i + half].id);
                let (white, black) = match upper_color {
                    Color::White => (top, bottom),
                    Color::Black => (bottom, top),
                };
                Game::new(1, i as u32 + 1, white, black)
            })
            .collect();

        let mut floats = Vec::new();
        if let Some(p) = bye {
            games.push(Game::bye(1, games.len() as u32 + 1, p.id));
            floats.push(FloatRecord {
                player: p.id,
                round: 1,
                direction: FloatDirection::Down,
            });
        }

        RoundPairing {
            round: 1,
            success: true,
            method: SearchTier::Straightforward,
            games,
            bye: bye.map(|p| p.id),
            unpaired: Vec::new(),
            floats,
            violations: Vec::new(),
            candidates_examined: 0,
        }
    }

    // =========================================================================
    // Rounds 2+
    // =========================================================================

    fn pair_later_round(&self, active: &[&Player], round: u32) -> RoundPairing {
        let lookup: HashMap<PlayerId, &Player> = active.iter().map(|p| (p.id, *p)).collect();

        // `examined` covers every BYE attempt, not only the one kept
        let (bye, plan, examined) = if active.len() % 2 == 1 {
            let (bye, plan, examined) = self.select_bye(active, round, &lookup);
            (Some(bye), plan, examined)
        } else {
            let plan = self.plan(active, round, &lookup);
            let examined = plan.examined;
            (None, plan, examined)
        };

        let mut violations = Vec::new();
        let mut floats = Vec::new();

        // Colors
        let mut pairs: Vec<(Pair, Score, Score, usize)> = Vec::with_capacity(plan.pairs.len());
        let ranks = rank_positions(active);
        for &(a, b) in &plan.pairs {
            let (Some(&pa), Some(&pb)) = (lookup.get(&a), lookup.get(&b)) else {
                continue;
            };
            let pair = self.allocate_colors(pa, pb, round, &mut violations);
            let best_rank = [a, b]
                .iter()
                .filter_map(|id| ranks.get(id).copied())
                .min()
                .unwrap_or(usize::MAX);
            pairs.push((pair, pa.score.max(pb.score), pa.score + pb.score, best_rank));

            if let Some(records) = floats_for_pair(round, (a, pa.score), (b, pb.score)) {
                for record in records {
                    note_float_repeat(&lookup, round, record, &mut violations);
                    floats.push(record);
                }
            }
        }

        // Boards: higher score first, then score sum, then the best-ranked player
        pairs.sort_by(|x, y| {
            y.1.cmp(&x.1)
                .then_with(|| y.2.cmp(&x.2))
                .then_with(|| x.3.cmp(&y.3))
        });
        let mut games: Vec<Game> = pairs
            .iter()
            .enumerate()
            .map(|(i, (pair, ..))| Game::new(round, i as u32 + 1, pair.white, pair.black))
            .collect();

        if let Some(id) = bye {
            games.push(Game::bye(round, games.len() as u32 + 1, id));
            let record = FloatRecord {
                player: id,
                round,
                direction: FloatDirection::Down,
            };
            note_float_repeat(&lookup, round, record, &mut violations);
            floats.push(record);
        }

        for &player in &plan.unpaired {
            warn!(round, player, "no legal opponent left");
            violations.push(QualityViolation::Unpaired { player });
        }

        let method = if plan.unpaired.is_empty() {
            plan.method
        } else {
            SearchTier::BoundedFallback
        };

        RoundPairing {
            round,
            success: plan.unpaired.is_empty(),
            method,
            games,
            bye,
            unpaired: plan.unpaired,
            floats,
            violations,
            candidates_examined: examined,
        }
    }

    /// Choose the BYE so that the remaining field pairs completely.
    ///
    /// Eligible players are tried in BYE order, at most `max_bye_attempts` of
    /// them. The first whose removal leaves a complete round wins; otherwise
    /// the attempt leaving the fewest players unpaired.
    fn select_bye(
        &self,
        active: &[&Player],
        round: u32,
        lookup: &HashMap<PlayerId, &Player>,
    ) -> (PlayerId, Plan, u64) {
        let candidates = bye_candidates(active);
        let attempts = self.config.max_bye_attempts.max(1);
        let mut examined = 0;
        let mut best: Option<(PlayerId, Plan)> = None;

        for candidate in candidates.iter().take(attempts) {
            let rest: Vec<&Player> = active
                .iter()
                .copied()
                .filter(|p| p.id != candidate.id)
                .collect();
            let plan = self.plan(&rest, round, lookup);
            examined += plan.examined;
            debug!(
                round,
                candidate = candidate.id,
                unpaired = plan.unpaired.len(),
                "BYE candidate tried"
            );

            let complete = plan.unpaired.is_empty();
            let improves = match &best {
                Some((_, b)) => plan.unpaired.len() < b.unpaired.len(),
                None => true,
            };
            if improves {
                best = Some((candidate.id, plan));
            }
            if complete {
                break;
            }
        }

        match best {
            Some((id, plan)) => (id, plan, examined),
            // Unreachable with an odd field of three or more, kept total anyway
            None => (active[active.len() - 1].id, self.plan(active, round, lookup), examined),
        }
    }

    /// Pair brackets top-down, then repair leftovers.
    fn plan(&self, players: &[&Player], round: u32, lookup: &HashMap<PlayerId, &Player>) -> Plan {
        let groups = group_by_score(players.iter().copied());
        let mut pairs: Vec<(PlayerId, PlayerId)> = Vec::new();
        let mut carried: Vec<&Player> = Vec::new();
        let mut method = SearchTier::Straightforward;
        let mut examined = 0;

        let last_index = groups.len().saturating_sub(1);
        for (i, group) in groups.iter().enumerate() {
            let mut members = std::mem::take(&mut carried);
            members.extend(group.players.iter().copied());
            let next = groups.get(i + 1).map(|g| g.players.as_slice()).unwrap_or(&[]);
            let bracket = Bracket::new(group.score, &members, round).with_next(next, round);
            let outcome = pair_bracket(&bracket, &self.config, i == last_index);

            method = method.max(outcome.tier);
            examined += outcome.examined;
            pairs.extend(outcome.pairs);
            carried = outcome
                .floaters
                .iter()
                .filter_map(|id| lookup.get(id).copied())
                .collect();
        }

        let mut plan = Plan {
            pairs,
            unpaired: carried.iter().map(|p| p.id).collect(),
            method,
            examined,
        };
        if !plan.unpaired.is_empty() {
            self.repair(&mut plan, round, lookup);
        }
        plan
    }

    /// Reopen the lowest pairs one at a time and pair them again together
    /// with the leftovers, keeping the attempt with the fewest players unpaired.
    fn repair(&self, plan: &mut Plan, round: u32, lookup: &HashMap<PlayerId, &Player>) {
        let depth_limit = self.config.max_repair_depth.min(plan.pairs.len());
        let mut best: Option<(usize, Vec<(PlayerId, PlayerId)>, Vec<PlayerId>)> = None;

        for depth in 1..=depth_limit {
            let keep = plan.pairs.len() - depth;
            let pool: Vec<&Player> = plan.pairs[keep..]
                .iter()
                .flat_map(|&(a, b)| [a, b])
                .chain(plan.unpaired.iter().copied())
                .filter_map(|id| lookup.get(&id).copied())
                .collect();
            let Some(floor) = pool.iter().map(|p| p.score).min() else {
                continue;
            };

            let bracket = Bracket::new(floor, &pool, round);
            let outcome = pair_bracket(&bracket, &self.config, true);
            plan.examined += outcome.examined;

            let better = match &best {
                Some((_, _, unpaired)) => outcome.floaters.len() < unpaired.len(),
                None => outcome.floaters.len() < plan.unpaired.len(),
            };
            if better {
                best = Some((keep, outcome.pairs, outcome.floaters));
            }
            if best.as_ref().is_some_and(|(_, _, unpaired)| unpaired.is_empty()) {
                break;
            }
        }

        if let Some((keep, repaired, unpaired)) = best {
            debug!(
                round,
                reopened = plan.pairs.len() - keep,
                unpaired = unpaired.len(),
                "leftovers repaired"
            );
            plan.pairs.truncate(keep);
            plan.pairs.extend(repaired);
            plan.unpaired = unpaired;
            plan.method = SearchTier::BoundedFallback;
        }
    }

    /// Decide colors for a pair and note any compromise.
    fn allocate_colors(
        &self,
        a: &Player,
        b: &Player,
        round: u32,
        violations: &mut Vec<QualityViolation>,
    ) -> Pair {
        let (higher, lower) = if outranks(a, b) { (a, b) } else { (b, a) };
        let (hp, lp) = (color_preference(&higher.colors), color_preference(&lower.colors));
        let alloc = assign_colors(hp, lp, self.config.initial_color);

        if let Some(strength) = alloc.overridden {
            if strength >= Strength::Strong {
                let loser = if Some(alloc.higher) == hp.color {
                    lower.id
                } else {
                    higher.id
                };
                warn!(round, player = loser, ?strength, "color preference overridden");
                violations.push(QualityViolation::ColorOverride {
                    player: loser,
                    strength,
                });
            }
        }

        for (player, color) in [(higher, alloc.higher), (lower, alloc.lower())] {
            let mut history = player.colors.clone();
            history.push(Some(color));
            for issue in color_issues(&history) {
                warn!(round, player = player.id, ?issue, "color rule broken");
                violations.push(QualityViolation::ColorRule {
                    player: player.id,
                    issue,
                });
            }
        }

        if alloc.higher == Color::White {
            Pair {
                white: higher.id,
                black: lower.id,
            }
        } else {
            Pair {
                white: lower.id,
                black: higher.id,
            }
        }
    }
}

impl PairingStrategy for DutchEngine {
    fn name(&self) -> &str {
        "dutch"
    }

    fn pair_round(
        &self,
        players: &[Player],
        round: u32,
        total_rounds: u32,
    ) -> Result<RoundPairing, ValidationError> {
        DutchEngine::pair_round(self, players, round, total_rounds)
    }
}

/// Position of every player in the field's pairing order.
fn rank_positions(players: &[&Player]) -> HashMap<PlayerId, usize> {
    let mut ranked: Vec<&Player> = players.to_vec();
    ranked.sort_by(|a, b| rank_order(a, b));
    ranked.iter().enumerate().map(|(i, p)| (p.id, i)).collect()
}

fn note_float_repeat(
    lookup: &HashMap<PlayerId, &Player>,
    round: u32,
    record: FloatRecord,
    violations: &mut Vec<QualityViolation>,
) {
    let Some(player) = lookup.get(&record.player) else {
        return;
    };
    if previous_float(player, round) == Some(record.direction) {
        debug!(round, player = record.player, direction = ?record.direction, "float repeated");
        violations.push(QualityViolation::FloatRepeat {
            player: record.player,
            direction: record.direction,
        });
    }
}

#[cfg(test)]
#[path = "engine_tests.rs"]
mod engine_tests;
