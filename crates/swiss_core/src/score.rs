//! Score grouping and Pairing Score Differences (PSD)
//!
//! Players are grouped into score brackets processed from the top down. The PSD
//! of a candidate pairing is the list of score differences it creates; the
//! engine keeps the candidate whose PSD is smallest.

use std::cmp::Ordering;

use crate::types::{Player, Score};

/// Pairing order inside the field: score, then rating, then seeding number.
///
/// Unrated players sort after rated ones; the id breaks any remaining tie so
/// the order is total and reproducible.
pub fn rank_order(a: &Player, b: &Player) -> Ordering {
    b.score
        .cmp(&a.score)
        .then_with(|| b.rating.cmp(&a.rating))
        .then_with(|| a.seed.cmp(&b.seed))
        .then_with(|| a.id.cmp(&b.id))
}

/// True if `a` ranks above `b` for color decisions (score, then seeding).
pub fn outranks(a: &Player, b: &Player) -> bool {
    b.score
        .cmp(&a.score)
        .then_with(|| a.seed.cmp(&b.seed))
        .then_with(|| a.id.cmp(&b.id))
        == Ordering::Less
}

/// Players sharing one cumulative score, in pairing order.
#[derive(Debug, Clone)]
pub struct ScoreGroup<'a> {
    pub score: Score,
    pub players: Vec<&'a Player>,
}

/// Partition the active players into score-descending groups.
pub fn group_by_score<'a, I>(players: I) -> Vec<ScoreGroup<'a>>
where
    I: IntoIterator<Item = &'a Player>,
{
    let mut ranked: Vec<&Player> = players.into_iter().filter(|p| p.active).collect();
    ranked.sort_by(|a, b| rank_order(a, b));

    let mut groups: Vec<ScoreGroup<'a>> = Vec::new();
    for player in ranked {
        match groups.last_mut() {
            Some(group) if group.score == player.score => group.players.push(player),
            _ => groups.push(ScoreGroup {
                score: player.score,
                players: vec![player],
            }),
        }
    }
    groups
}

// =============================================================================
// PSD
// =============================================================================

/// Pairing Score Difference of one candidate.
///
/// Differences are kept sorted from largest to smallest. Candidates compare by
/// total first, then lexicographically, so of two candidates with the same
/// total the one that avoids the single largest gap wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Psd {
    differences: Vec<Score>,
    total: Score,
}

impl Psd {
    pub fn new(mut differences: Vec<Score>) -> Self {
        differences.sort_unstable_by(|a, b| b.cmp(a));
        let total = differences.iter().fold(Score::ZERO, |acc, &d| acc + d);
        Self { differences, total }
    }

    pub fn total(&self) -> Score {
        self.total
    }

    pub fn differences(&self) -> &[Score] {
        &self.differences
    }

    /// This PSD with one more difference.
    fn with(&self, difference: Score) -> Psd {
        let mut differences = self.differences.clone();
        let at = differences.partition_point(|&d| d > difference);
        differences.insert(at, difference);
        Psd {
            differences,
            total: self.total + difference,
        }
    }
}

impl Ord for Psd {
    fn cmp(&self, other: &Self) -> Ordering {
        self.total
            .cmp(&other.total)
            .then_with(|| self.differences.cmp(&other.differences))
    }
}

impl PartialOrd for Psd {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// PSD of a list of paired scores.
pub fn calculate_psd(pairs: &[(Score, Score)]) -> Psd {
    Psd::new(pairs.iter().map(|(a, b)| a.abs_diff(*b)).collect())
}

/// PSD contribution of a player floated out of a bracket.
///
/// The floater is treated as paired against a virtual opponent one point
/// below the bracket, so floating a moved-down player costs more than
/// floating a resident.
pub fn float_difference(score: Score, bracket_score: Score) -> Score {
    (score + Score::ONE).abs_diff(bracket_score)
}

/// Smallest PSD reachable with exactly `pairs` pairs if no pair were
/// forbidden, under the full PSD order (total, then the sorted differences).
/// Returns `None` when `scores` cannot hold that many pairs.
///
/// On a line the optimum only ever pairs neighbours in sorted order, so a
/// dynamic program over the sorted scores is exact. Adding the same
/// difference to two PSDs keeps their order, which lets the program compare
/// whole PSDs instead of totals.
pub fn psd_lower_bound(scores: &[Score], bracket_score: Score, pairs: usize) -> Option<Psd> {
    let n = scores.len();
    if pairs * 2 > n {
        return None;
    }
    let mut sorted = scores.to_vec();
    sorted.sort_unstable_by(|a, b| b.cmp(a));

    // Row i holds the best PSD over the first i players for each pair count
    let mut two_back: Vec<Option<Psd>> = vec![None; pairs + 1];
    let mut one_back: Vec<Option<Psd>> = vec![None; pairs + 1];
    one_back[0] = Some(Psd::default());
    for i in 1..=n {
        let mut row: Vec<Option<Psd>> = vec![None; pairs + 1];
        for (j, slot) in row.iter_mut().enumerate() {
            let floated = one_back[j]
                .as_ref()
                .map(|p| p.with(float_difference(sorted[i - 1], bracket_score)));
            let paired = if i >= 2 && j >= 1 {
                two_back[j - 1]
                    .as_ref()
                    .map(|p| p.with(sorted[i - 2].abs_diff(sorted[i - 1])))
            } else {
                None
            };
            *slot = match (floated, paired) {
                (Some(a), Some(b)) => Some(a.min(b)),
                (a, b) => a.or(b),
            };
        }
        two_back = std::mem::replace(&mut one_back, row);
    }
    one_back[pairs].take()
}

#[cfg(test)]
#[path = "score_tests.rs"]
mod score_tests;
