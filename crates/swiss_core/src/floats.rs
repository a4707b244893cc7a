//! Float history: who was moved up or down a bracket in which round.
//!
//! Floats only ever act as a quality signal. A pairing that repeats last
//! round's float is worse than one that doesn't, never illegal.

use serde::{Deserialize, Serialize};

use crate::types::{FloatDirection, Player, PlayerId, Score};

/// A float produced by a round's pairing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FloatRecord {
    pub player: PlayerId,
    pub round: u32,
    pub direction: FloatDirection,
}

/// Float recorded for `player` in `round`, if any.
pub fn float_in(player: &Player, round: u32) -> Option<FloatDirection> {
    player.floats.get(&round).copied()
}

/// Float of the round before `round`.
pub fn previous_float(player: &Player, round: u32) -> Option<FloatDirection> {
    round.checked_sub(1).and_then(|r| float_in(player, r))
}

pub fn record_float(player: &mut Player, record: FloatRecord) {
    debug_assert_eq!(player.id, record.player);
    player.floats.insert(record.round, record.direction);
}

/// Floats created by pairing two players: the higher score floats down and
/// the lower score floats up. Equal scores create none.
pub fn floats_for_pair(
    round: u32,
    (a, a_score): (PlayerId, Score),
    (b, b_score): (PlayerId, Score),
) -> Option<[FloatRecord; 2]> {
    let (high, low) = match a_score.cmp(&b_score) {
        std::cmp::Ordering::Equal => return None,
        std::cmp::Ordering::Greater => (a, b),
        std::cmp::Ordering::Less => (b, a),
    };
    Some([
        FloatRecord {
            player: high,
            round,
            direction: FloatDirection::Down,
        },
        FloatRecord {
            player: low,
            round,
            direction: FloatDirection::Up,
        },
    ])
}
