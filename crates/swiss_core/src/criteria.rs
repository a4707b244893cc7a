//! Pairing criteria, in priority order.
//!
//! Absolute criteria decide whether two players may meet at all. Quality
//! criteria rank legal candidates against each other. Both lists are plain
//! data: the order of `ABSOLUTE_CRITERIA` and `QUALITY_CRITERIA` *is* the rule
//! hierarchy.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::bracket::BracketPlayer;
use crate::color::{absolute_compatible, assign_colors, Strength};
use crate::score::{outranks, Psd};
use crate::types::{Color, FloatDirection};

// =============================================================================
// Absolute criteria
// =============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AbsoluteCriterion {
    /// Two players meet at most once
    NoRematch,
    /// Two players who must both get the same color cannot meet
    AbsoluteColor,
}

pub const ABSOLUTE_CRITERIA: [AbsoluteCriterion; 2] =
    [AbsoluteCriterion::NoRematch, AbsoluteCriterion::AbsoluteColor];

impl AbsoluteCriterion {
    /// Whether the criterion may be dropped to produce a playable round.
    /// A rematch never is.
    pub fn relaxable(self) -> bool {
        match self {
            AbsoluteCriterion::NoRematch => false,
            AbsoluteCriterion::AbsoluteColor => true,
        }
    }

    pub fn allows(self, a: &BracketPlayer, b: &BracketPlayer) -> bool {
        match self {
            AbsoluteCriterion::NoRematch => {
                !a.player.has_played(b.id()) && !b.player.has_played(a.id())
            }
            AbsoluteCriterion::AbsoluteColor => absolute_compatible(a.preference, b.preference),
        }
    }
}

/// First criterion (in priority order) the pair breaks.
pub fn first_violation(
    a: &BracketPlayer,
    b: &BracketPlayer,
    relaxed: bool,
) -> Option<AbsoluteCriterion> {
    ABSOLUTE_CRITERIA
        .iter()
        .copied()
        .filter(|c| !(relaxed && c.relaxable()))
        .find(|c| !c.allows(a, b))
}

pub fn pair_allowed(a: &BracketPlayer, b: &BracketPlayer, relaxed: bool) -> bool {
    first_violation(a, b, relaxed).is_none()
}

// =============================================================================
// Quality criteria
// =============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QualityCriterion {
    /// More pairs is better
    PairedCount,
    /// Smaller PSD is better
    ScoreDifference,
    /// Fewer floaters without a legal opponent in the next bracket
    NextBracket,
    /// Fewer overridden strong or absolute color preferences
    ColorViolations,
    /// Fewer players floated the same way as last round
    FloatRepeats,
    /// Earlier in the search wins the remaining ties
    DiscoveryOrder,
}

pub const QUALITY_CRITERIA: [QualityCriterion; 6] = [
    QualityCriterion::PairedCount,
    QualityCriterion::ScoreDifference,
    QualityCriterion::NextBracket,
    QualityCriterion::ColorViolations,
    QualityCriterion::FloatRepeats,
    QualityCriterion::DiscoveryOrder,
];

/// Measured quality of one candidate pairing of a bracket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateQuality {
    pub paired: usize,
    pub psd: Psd,
    /// Floaters nobody in the next bracket may meet
    pub stranded: u32,
    pub color_violations: u32,
    pub float_repeats: u32,
    pub discovery: u64,
}

impl QualityCriterion {
    /// `Less` means `a` is the better candidate under this criterion.
    pub fn compare(self, a: &CandidateQuality, b: &CandidateQuality) -> Ordering {
        match self {
            QualityCriterion::PairedCount => b.paired.cmp(&a.paired),
            QualityCriterion::ScoreDifference => a.psd.cmp(&b.psd),
            QualityCriterion::NextBracket => a.stranded.cmp(&b.stranded),
            QualityCriterion::ColorViolations => a.color_violations.cmp(&b.color_violations),
            QualityCriterion::FloatRepeats => a.float_repeats.cmp(&b.float_repeats),
            QualityCriterion::DiscoveryOrder => a.discovery.cmp(&b.discovery),
        }
    }
}

impl CandidateQuality {
    pub fn compare(&self, other: &CandidateQuality) -> Ordering {
        QUALITY_CRITERIA
            .iter()
            .map(|c| c.compare(self, other))
            .find(|o| *o != Ordering::Equal)
            .unwrap_or(Ordering::Equal)
    }

    pub fn is_better_than(&self, other: &CandidateQuality) -> bool {
        self.compare(other) == Ordering::Less
    }
}

/// 1 if pairing `a` with `b` overrides a strong or absolute color preference.
pub fn pair_color_penalty(a: &BracketPlayer, b: &BracketPlayer) -> u32 {
    let (higher, lower) = if outranks(a.player, b.player) {
        (a, b)
    } else {
        (b, a)
    };
    // The initial color only matters when nobody has a preference
    let alloc = assign_colors(higher.preference, lower.preference, Color::White);
    match alloc.overridden {
        Some(s) if s >= Strength::Strong => 1,
        _ => 0,
    }
}

/// Number of players in the pair who float the same way they did last round.
pub fn pair_float_penalty(a: &BracketPlayer, b: &BracketPlayer) -> u32 {
    let (high, low) = match a.score().cmp(&b.score()) {
        Ordering::Equal => return 0,
        Ordering::Greater => (a, b),
        Ordering::Less => (b, a),
    };
    u32::from(high.last_float == Some(FloatDirection::Down))
        + u32::from(low.last_float == Some(FloatDirection::Up))
}

/// 1 if a player floated out of the bracket already floated down last round.
pub fn floater_penalty(p: &BracketPlayer) -> u32 {
    u32::from(p.last_float == Some(FloatDirection::Down))
}

/// Fewest color violations possible with `pairs` pairs among `players`.
///
/// Each pair can satisfy at most one player wanting white and one wanting
/// black; floated players need nothing.
pub fn color_violation_bound(players: &[&BracketPlayer], pairs: usize) -> u32 {
    let wants = |color: Color| {
        players
            .iter()
            .filter(|p| p.preference.strength >= Strength::Strong && p.preference.color == Some(color))
            .count()
    };
    let excess = wants(Color::White).saturating_sub(pairs) + wants(Color::Black).saturating_sub(pairs);
    let floated = players.len().saturating_sub(pairs * 2);
    excess.saturating_sub(floated) as u32
}

#[cfg(test)]
#[path = "criteria_tests.rs"]
mod criteria_tests;
