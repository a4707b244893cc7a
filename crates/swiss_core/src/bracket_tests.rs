use super::*;
use crate::types::Color::{Black, White};

fn player(id: u32, points: f64) -> Player {
    Player::new(id, &format!("p{id}"), id).with_score(points)
}

fn played(players: &mut [Player], a: u32, b: u32) {
    for p in players.iter_mut() {
        if p.id == a {
            p.opponents.insert(b);
        }
        if p.id == b {
            p.opponents.insert(a);
        }
    }
}

fn bracket<'a>(score: f64, players: &'a [Player]) -> Bracket<'a> {
    let refs: Vec<&Player> = players.iter().collect();
    Bracket::new(Score::from(score), &refs, 4)
}

#[test]
fn test_bracket_ranks_and_splits() {
    let players = vec![player(3, 1.0), player(1, 1.0), player(4, 1.0), player(2, 1.0)];
    let b = bracket(1.0, &players);
    let ids: Vec<u32> = b.players.iter().map(|p| p.id()).collect();
    assert_eq!(ids, vec![1, 2, 3, 4]);
    assert_eq!(b.players[1].subgroup, Subgroup::Upper);
    assert_eq!(b.players[2].subgroup, Subgroup::Lower);
    assert!(b.is_homogeneous());
}

#[test]
fn test_straightforward_pairing() {
    let players: Vec<Player> = (1..=4).map(|id| player(id, 1.0)).collect();
    let outcome = pair_bracket(&bracket(1.0, &players), &PairingConfig::default(), false);
    assert_eq!(outcome.pairs, vec![(1, 3), (2, 4)]);
    assert!(outcome.floaters.is_empty());
    assert_eq!(outcome.tier, SearchTier::Straightforward);
}

#[test]
fn test_rematch_forces_transposition() {
    let mut players: Vec<Player> = (1..=4).map(|id| player(id, 1.0)).collect();
    played(&mut players, 1, 3);
    let outcome = pair_bracket(&bracket(1.0, &players), &PairingConfig::default(), false);
    assert_eq!(outcome.pairs, vec![(1, 4), (2, 3)]);
    assert_eq!(outcome.tier, SearchTier::Transposition);
}

#[test]
fn test_exchange_when_transpositions_fail() {
    let mut players: Vec<Player> = (1..=4).map(|id| player(id, 1.0)).collect();
    played(&mut players, 1, 3);
    played(&mut players, 1, 4);
    let outcome = pair_bracket(&bracket(1.0, &players), &PairingConfig::default(), false);
    assert_eq!(outcome.pairs, vec![(1, 2), (3, 4)]);
    assert_eq!(outcome.tier, SearchTier::Exchange);
}

#[test]
fn test_odd_bracket_floats_lowest() {
    let players: Vec<Player> = (1..=3).map(|id| player(id, 2.0)).collect();
    let outcome = pair_bracket(&bracket(2.0, &players), &PairingConfig::default(), false);
    assert_eq!(outcome.pairs, vec![(1, 2)]);
    assert_eq!(outcome.floaters, vec![3]);
}

#[test]
fn test_moved_down_player_is_paired() {
    let players = vec![player(1, 3.0), player(2, 2.0), player(3, 2.0), player(4, 2.0)];
    let b = bracket(2.0, &players);
    assert!(!b.is_homogeneous());
    assert_eq!(b.moved_down_count(), 1);

    let outcome = pair_bracket(&b, &PairingConfig::default(), false);
    assert_eq!(outcome.pairs.len(), 2);
    assert!(outcome.pairs.iter().any(|&(a, b)| a == 1 || b == 1));
}

#[test]
fn test_moved_down_player_not_floated_again() {
    let players = vec![player(1, 3.0), player(2, 2.0), player(3, 2.0)];
    let outcome = pair_bracket(&bracket(2.0, &players), &PairingConfig::default(), false);
    assert_eq!(outcome.pairs.len(), 1);
    assert_ne!(outcome.floaters, vec![1]);
}

#[test]
fn test_unpairable_bracket_floats_everyone() {
    let mut players: Vec<Player> = (1..=4).map(|id| player(id, 1.0)).collect();
    for a in 1..=4 {
        for b in a + 1..=4 {
            played(&mut players, a, b);
        }
    }
    let outcome = pair_bracket(&bracket(1.0, &players), &PairingConfig::default(), false);
    assert!(outcome.pairs.is_empty());
    assert_eq!(outcome.floaters.len(), 4);
}

#[test]
fn test_partial_pairing_floats_the_blocked_players() {
    // 1 has met everyone else, so 1 floats and one more player floats with them
    let mut players: Vec<Player> = (1..=4).map(|id| player(id, 1.0)).collect();
    for b in 2..=4 {
        played(&mut players, 1, b);
    }
    let outcome = pair_bracket(&bracket(1.0, &players), &PairingConfig::default(), false);
    assert_eq!(outcome.pairs.len(), 1);
    assert_eq!(outcome.floaters.len(), 2);
    assert!(outcome.floaters.contains(&1));
}

#[test]
fn test_absolute_color_conflict_relaxed_only_in_last_bracket() {
    let mut players = vec![player(1, 2.0), player(2, 2.0)];
    for p in players.iter_mut() {
        p.colors = vec![Some(White), Some(White)];
    }

    let intermediate = pair_bracket(&bracket(2.0, &players), &PairingConfig::default(), false);
    assert!(intermediate.pairs.is_empty());
    assert_eq!(intermediate.floaters.len(), 2);

    let last = pair_bracket(&bracket(2.0, &players), &PairingConfig::default(), true);
    assert_eq!(last.pairs, vec![(1, 2)]);
    assert!(last.relaxed);
    assert_eq!(last.tier, SearchTier::BoundedFallback);
}

#[test]
fn test_color_preferences_steer_transposition() {
    let mut players: Vec<Player> = (1..=4).map(|id| player(id, 1.5)).collect();
    // 1 and 3 strongly want black, 2 and 4 strongly want white
    players[0].colors = vec![Some(White), Some(Black), Some(White)];
    players[2].colors = vec![Some(White), Some(Black), Some(White)];
    players[1].colors = vec![Some(Black), Some(White), Some(Black)];
    players[3].colors = vec![Some(Black), Some(White), Some(Black)];

    let outcome = pair_bracket(&bracket(1.5, &players), &PairingConfig::default(), false);
    assert_eq!(outcome.pairs, vec![(1, 4), (2, 3)]);
    assert_eq!(outcome.tier, SearchTier::Transposition);
}

#[test]
fn test_float_repeat_avoided_for_odd_bracket() {
    let mut players: Vec<Player> = (1..=3).map(|id| player(id, 1.0)).collect();
    // Player 3 floated down last round (round 3, bracket built for round 4)
    players[2].floats.insert(3, FloatDirection::Down);
    let outcome = pair_bracket(&bracket(1.0, &players), &PairingConfig::default(), false);
    assert_eq!(outcome.floaters.len(), 1);
    assert_ne!(outcome.floaters, vec![3]);
}

#[test]
fn test_candidate_cap_keeps_a_playable_answer() {
    let mut players: Vec<Player> = (1..=4).map(|id| player(id, 1.0)).collect();
    played(&mut players, 1, 3);
    let config = PairingConfig {
        max_candidates: 1,
        ..Default::default()
    };
    let outcome = pair_bracket(&bracket(1.0, &players), &config, false);
    assert!(outcome.capped);
    assert_eq!(outcome.pairs.len(), 2);
    for &(a, b) in &outcome.pairs {
        assert!(!(a == 1 && b == 3));
    }
}

#[test]
fn test_split_follows_subgroups() {
    let players: Vec<Player> = (1..=4).map(|id| player(id, 1.0)).collect();
    let mut b = bracket(1.0, &players);
    b.players[1].subgroup = Subgroup::Lower;
    b.players[2].subgroup = Subgroup::Upper;
    let outcome = pair_bracket(&b, &PairingConfig::default(), false);
    assert_eq!(outcome.pairs, vec![(1, 2), (3, 4)]);
    assert_eq!(outcome.tier, SearchTier::Straightforward);
}

#[test]
fn test_floater_must_have_an_opponent_below() {
    let mut players = vec![player(1, 2.0), player(3, 2.0), player(4, 2.0)];
    let mut below = vec![player(6, 1.0)];
    players[2].opponents.insert(6);
    below[0].opponents.insert(4);

    // Alone, the bracket floats its lowest player
    let alone = pair_bracket(&bracket(2.0, &players), &PairingConfig::default(), false);
    assert_eq!(alone.floaters, vec![4]);

    let refs: Vec<&Player> = players.iter().collect();
    let next: Vec<&Player> = below.iter().collect();
    let b = Bracket::new(Score::from(2.0), &refs, 4).with_next(&next, 4);
    assert_eq!(b.next.len(), 1);
    let outcome = pair_bracket(&b, &PairingConfig::default(), false);
    assert_eq!(outcome.pairs, vec![(1, 4)]);
    assert_eq!(outcome.floaters, vec![3]);
    assert_eq!(outcome.tier, SearchTier::Transposition);
}

#[test]
fn test_even_differences_beat_an_equal_total() {
    // 1-4 with 2-3 totals two points like 1-2 with 3-4, but as [2, 0]
    let mut players = vec![player(1, 3.0), player(2, 2.0), player(3, 2.0), player(4, 1.0)];
    played(&mut players, 1, 3);
    let outcome = pair_bracket(&bracket(1.0, &players), &PairingConfig::default(), false);
    assert_eq!(outcome.pairs, vec![(1, 2), (3, 4)]);
    assert_eq!(outcome.tier, SearchTier::Exchange);
}
