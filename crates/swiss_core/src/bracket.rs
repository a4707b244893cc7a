//! Pairing a single score bracket.
//!
//! The bracket is split into an upper and a lower subgroup. The search then
//! walks, in order:
//! 1. the straightforward pairing `upper[i]` vs `lower[i]`
//! 2. the remaining transpositions of the lower subgroup
//! 3. exchanges between the subgroups, each with all its transpositions
//! 4. pool exchanges: moving extra players out of the bracket to float down
//!
//! Every arrangement is checked pair by pair against the absolute criteria
//! and abandoned (with its whole prefix) at the first failure. Legal
//! candidates are ranked by the quality criteria and the best one is kept.
//! The search stops early once a candidate reaches the best quality the
//! bracket can possibly have, or when the candidate cap is hit.
//!
//! When the next bracket down is known, a floater that could not legally
//! meet anyone there counts against the candidate.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::color::{color_preference, ColorPreference};
use crate::config::PairingConfig;
use crate::criteria::{
    color_violation_bound, floater_penalty, pair_allowed, pair_color_penalty, pair_float_penalty,
    CandidateQuality,
};
use crate::exchange::{Exchanges, PoolExchanges};
use crate::floats::previous_float;
use crate::score::{float_difference, psd_lower_bound, rank_order, Psd};
use crate::transposition::Transpositions;
use crate::types::{FloatDirection, Player, PlayerId, Score};

/// Search stage that produced a pairing, from cheapest to most desperate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchTier {
    Straightforward,
    Transposition,
    Exchange,
    BoundedFallback,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Subgroup {
    Upper,
    Lower,
}

/// A player as seen by one round's bracket.
#[derive(Debug, Clone)]
pub struct BracketPlayer<'a> {
    pub player: &'a Player,
    /// Position inside the bracket, 0 is the highest ranked
    pub rank: usize,
    pub subgroup: Subgroup,
    pub preference: ColorPreference,
    /// Float of the previous round
    pub last_float: Option<FloatDirection>,
    /// Scored above the bracket and was carried down into it
    pub moved_down: bool,
}

impl<'a> BracketPlayer<'a> {
    pub fn new(player: &'a Player, round: u32, bracket_score: Score) -> Self {
        Self {
            player,
            rank: 0,
            subgroup: Subgroup::Upper,
            preference: color_preference(&player.colors),
            last_float: previous_float(player, round),
            moved_down: player.score > bracket_score,
        }
    }

    pub fn id(&self) -> PlayerId {
        self.player.id
    }

    pub fn score(&self) -> Score {
        self.player.score
    }
}

/// Players paired together at one score level.
#[derive(Debug, Clone)]
pub struct Bracket<'a> {
    pub score: Score,
    pub players: Vec<BracketPlayer<'a>>,
    /// Residents of the next bracket down, empty for the lowest one
    pub next: Vec<BracketPlayer<'a>>,
}

impl<'a> Bracket<'a> {
    /// Build a bracket from residents and any players carried down into it.
    pub fn new(score: Score, players: &[&'a Player], round: u32) -> Self {
        let mut members: Vec<BracketPlayer<'a>> = players
            .iter()
            .map(|p| BracketPlayer::new(p, round, score))
            .collect();
        members.sort_by(|a, b| rank_order(a.player, b.player));
        let half = members.len() / 2;
        for (rank, member) in members.iter_mut().enumerate() {
            member.rank = rank;
            member.subgroup = if rank < half {
                Subgroup::Upper
            } else {
                Subgroup::Lower
            };
        }
        Self {
            score,
            players: members,
            next: Vec::new(),
        }
    }

    /// Attach the players this bracket's floaters would meet.
    pub fn with_next(mut self, next: &[&'a Player], round: u32) -> Self {
        self.next = next
            .iter()
            .map(|p| BracketPlayer::new(p, round, p.score))
            .collect();
        self
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    /// True when nobody was carried down into the bracket.
    pub fn is_homogeneous(&self) -> bool {
        self.players.iter().all(|p| !p.moved_down)
    }

    pub fn moved_down_count(&self) -> usize {
        self.players.iter().filter(|p| p.moved_down).count()
    }
}

/// Result of pairing one bracket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BracketOutcome {
    /// Higher-ranked player first
    pub pairs: Vec<(PlayerId, PlayerId)>,
    /// Players left over, to float into the next bracket
    pub floaters: Vec<PlayerId>,
    pub tier: SearchTier,
    pub examined: u64,
    /// Absolute color rules had to be dropped
    pub relaxed: bool,
    /// The candidate cap was reached
    pub capped: bool,
}

/// Pair one bracket.
///
/// `last` marks the lowest bracket of the round: leftovers there have nowhere
/// to float, so if the absolute color rule leaves players unpaired the search
/// is repeated without it.
pub fn pair_bracket(bracket: &Bracket, config: &PairingConfig, last: bool) -> BracketOutcome {
    let strict = BracketSearch::new(bracket, config, false).run();
    let parity = bracket.len() % 2;
    if strict.floaters.len() <= parity || !last {
        return strict;
    }

    let relaxed = BracketSearch::new(bracket, config, true).run();
    if relaxed.pairs.len() > strict.pairs.len() {
        debug!(
            score = %bracket.score,
            paired = relaxed.pairs.len(),
            "absolute color rule relaxed to complete the bracket"
        );
        BracketOutcome {
            tier: SearchTier::BoundedFallback,
            examined: strict.examined + relaxed.examined,
            ..relaxed
        }
    } else {
        strict
    }
}

// =============================================================================
// Search
// =============================================================================

#[derive(Debug, Clone)]
struct Candidate {
    /// Bracket positions
    pairs: Vec<(usize, usize)>,
    floaters: Vec<usize>,
    quality: CandidateQuality,
    tier: SearchTier,
}

/// Best quality a candidate with a given pair count could reach.
#[derive(Debug, Clone)]
struct QualityTarget {
    paired: usize,
    psd: Psd,
    stranded: u32,
    color_violations: u32,
}

struct BracketSearch<'b, 'a> {
    bracket: &'b Bracket<'a>,
    relaxed: bool,
    max_candidates: u64,
    examined: u64,
    capped: bool,
    best: Option<Candidate>,
    target: Option<QualityTarget>,
    /// Per position: no legal opponent in the next bracket
    stranded: Vec<bool>,
}

impl<'b, 'a> BracketSearch<'b, 'a> {
    fn new(bracket: &'b Bracket<'a>, config: &PairingConfig, relaxed: bool) -> Self {
        let stranded = bracket
            .players
            .iter()
            .map(|p| {
                !bracket.next.is_empty() && !bracket.next.iter().any(|q| pair_allowed(p, q, relaxed))
            })
            .collect();
        Self {
            bracket,
            relaxed,
            max_candidates: config.max_candidates.max(1),
            examined: 0,
            capped: false,
            best: None,
            target: None,
            stranded,
        }
    }

    fn run(mut self) -> BracketOutcome {
        let n = self.bracket.len();
        let players = &self.bracket.players;
        let (upper, lower): (Vec<usize>, Vec<usize>) =
            (0..n).partition(|&i| players[i].subgroup == Subgroup::Upper);

        let baseline = self.greedy();
        self.best = Some(baseline);

        // Tiers 1-3: every player of the bracket takes part
        self.target = self.target_for(n / 2);
        let stopped = self.search_members(&upper, &lower, &[], SearchTier::Straightforward);

        // Tier 4: float extra players out until the rest pairs
        if !stopped && !self.has_complete(n / 2) {
            let mut extra = 2;
            while extra <= n {
                let pairs = (n - extra) / 2;
                if self.has_complete(pairs) {
                    break;
                }
                if self.search_pool(extra) {
                    break;
                }
                extra += 2;
            }
        }

        self.into_outcome()
    }

    /// Search with `extra` players moved to the float pool. Returns true when
    /// the search must stop.
    fn search_pool(&mut self, extra: usize) -> bool {
        let n = self.bracket.len();
        self.target = self.target_for((n - extra) / 2);
        for out in PoolExchanges::new(n, extra) {
            let members: Vec<usize> = (0..n).filter(|i| !out.contains(i)).collect();
            let (upper, lower) = members.split_at(members.len() / 2);
            if self.search_members(upper, lower, &out, SearchTier::Exchange) {
                return true;
            }
        }
        false
    }

    /// Transpositions of the initial split, then every exchange of it.
    fn search_members(
        &mut self,
        upper: &[usize],
        lower: &[usize],
        out: &[usize],
        tier: SearchTier,
    ) -> bool {
        if self.search_split(upper, lower, out, tier) {
            return true;
        }

        for exchange in Exchanges::new(upper.len(), lower.len()) {
            let (mut new_upper, mut new_lower) = exchange.apply(upper, lower);
            new_upper.sort_unstable();
            new_lower.sort_unstable();
            let tier = tier.max(SearchTier::Exchange);
            if self.search_split(&new_upper, &new_lower, out, tier) {
                return true;
            }
        }
        false
    }

    fn search_split(
        &mut self,
        upper: &[usize],
        lower: &[usize],
        out: &[usize],
        tier: SearchTier,
    ) -> bool {
        let bracket: &'b Bracket<'a> = self.bracket;
        let players = &bracket.players;
        let mut arrangements = Transpositions::new(lower.len(), upper.len());
        let mut first = true;

        while let Some(arrangement) = arrangements.next() {
            if self.examined >= self.max_candidates {
                self.capped = true;
                return true;
            }
            self.examined += 1;

            let this_tier = match tier {
                SearchTier::Straightforward if first => SearchTier::Straightforward,
                SearchTier::Straightforward => SearchTier::Transposition,
                other => other,
            };
            first = false;

            let rejected = arrangement
                .iter()
                .enumerate()
                .position(|(i, &j)| !pair_allowed(&players[upper[i]], &players[lower[j]], self.relaxed));
            if let Some(position) = rejected {
                arrangements.skip_from(position);
                continue;
            }

            let pairs: Vec<(usize, usize)> = upper
                .iter()
                .zip(arrangement.iter())
                .map(|(&u, &j)| (u, lower[j]))
                .collect();
            let mut floaters: Vec<usize> = out.to_vec();
            floaters.extend(
                (0..lower.len())
                    .filter(|j| !arrangement.contains(j))
                    .map(|j| lower[j]),
            );
            floaters.sort_unstable();

            let candidate = self.evaluate(pairs, floaters, this_tier, self.examined);
            let reached = self.meets_target(&candidate.quality);
            self.offer(candidate);
            if reached {
                return true;
            }
        }
        false
    }

    /// Pair top-down with the first legal partner. Always available, so the
    /// bracket has an answer even if the cap cuts the search short.
    fn greedy(&self) -> Candidate {
        let players = &self.bracket.players;
        let n = players.len();
        let mut used = vec![false; n];
        let mut pairs = Vec::new();
        for i in 0..n {
            if used[i] {
                continue;
            }
            if let Some(j) =
                (i + 1..n).find(|&j| !used[j] && pair_allowed(&players[i], &players[j], self.relaxed))
            {
                used[i] = true;
                used[j] = true;
                pairs.push((i, j));
            }
        }
        let floaters = (0..n).filter(|&i| !used[i]).collect();
        self.evaluate(pairs, floaters, SearchTier::BoundedFallback, u64::MAX)
    }

    fn evaluate(
        &self,
        pairs: Vec<(usize, usize)>,
        floaters: Vec<usize>,
        tier: SearchTier,
        discovery: u64,
    ) -> Candidate {
        let players = &self.bracket.players;
        let mut differences: Vec<Score> = Vec::with_capacity(pairs.len() + floaters.len());
        let mut color_violations = 0;
        let mut float_repeats = 0;

        for &(a, b) in &pairs {
            let (a, b) = (&players[a], &players[b]);
            differences.push(a.score().abs_diff(b.score()));
            color_violations += pair_color_penalty(a, b);
            float_repeats += pair_float_penalty(a, b);
        }
        for &f in &floaters {
            differences.push(float_difference(players[f].score(), self.bracket.score));
            float_repeats += floater_penalty(&players[f]);
        }
        let stranded = floaters.iter().filter(|&&f| self.stranded[f]).count() as u32;

        Candidate {
            quality: CandidateQuality {
                paired: pairs.len(),
                psd: Psd::new(differences),
                stranded,
                color_violations,
                float_repeats,
                discovery,
            },
            pairs,
            floaters,
            tier,
        }
    }

    fn offer(&mut self, candidate: Candidate) {
        let better = match &self.best {
            Some(best) => candidate.quality.is_better_than(&best.quality),
            None => true,
        };
        if better {
            self.best = Some(candidate);
        }
    }

    /// Bound over every candidate with `pairs` pairs, whichever players float.
    fn target_for(&self, pairs: usize) -> Option<QualityTarget> {
        let players: Vec<&BracketPlayer> = self.bracket.players.iter().collect();
        let scores: Vec<Score> = players.iter().map(|p| p.score()).collect();
        let floated = players.len().saturating_sub(pairs * 2);
        let free = self.stranded.iter().filter(|&&s| !s).count();
        Some(QualityTarget {
            paired: pairs,
            psd: psd_lower_bound(&scores, self.bracket.score, pairs)?,
            stranded: floated.saturating_sub(free) as u32,
            color_violations: color_violation_bound(&players, pairs),
        })
    }

    fn meets_target(&self, quality: &CandidateQuality) -> bool {
        match &self.target {
            Some(target) => {
                quality.paired == target.paired
                    && quality.psd <= target.psd
                    && quality.stranded <= target.stranded
                    && quality.color_violations <= target.color_violations
                    && quality.float_repeats == 0
            }
            None => false,
        }
    }

    fn has_complete(&self, pairs: usize) -> bool {
        self.best
            .as_ref()
            .is_some_and(|b| b.quality.paired >= pairs && b.tier != SearchTier::BoundedFallback)
    }

    fn into_outcome(self) -> BracketOutcome {
        let players = &self.bracket.players;
        let n = players.len();
        let Some(best) = self.best else {
            return BracketOutcome {
                pairs: Vec::new(),
                floaters: players.iter().map(|p| p.id()).collect(),
                tier: SearchTier::BoundedFallback,
                examined: self.examined,
                relaxed: self.relaxed,
                capped: self.capped,
            };
        };

        let incomplete = best.floaters.len() > n % 2;
        let tier = if self.capped && incomplete {
            SearchTier::BoundedFallback
        } else {
            best.tier
        };

        debug_assert_eq!(best.pairs.len() * 2 + best.floaters.len(), n);
        debug!(
            score = %self.bracket.score,
            players = n,
            moved_down = self.bracket.moved_down_count(),
            pairs = best.pairs.len(),
            floaters = best.floaters.len(),
            tier = ?tier,
            examined = self.examined,
            "bracket searched"
        );

        BracketOutcome {
            pairs: best
                .pairs
                .iter()
                .map(|&(a, b)| (players[a].id(), players[b].id()))
                .collect(),
            floaters: best.floaters.iter().map(|&f| players[f].id()).collect(),
            tier,
            examined: self.examined,
            relaxed: self.relaxed,
            capped: self.capped,
        }
    }
}

#[cfg(test)]
#[path = "bracket_tests.rs"]
mod bracket_tests;
