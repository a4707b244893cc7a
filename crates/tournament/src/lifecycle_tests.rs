use super::*;
use chrono::{Duration, TimeZone};
use swiss_core::Score;

use crate::config::TournamentConfig;

fn start() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap()
}

/// Four players seeded 1-4 by id, round 1 paired: board 1 is 1-3, board 2 is 2-4.
fn paired_four(config: TournamentConfig) -> Tournament {
    let mut t = Tournament::new(config);
    for (name, rating) in [("Ann", 2400), ("Bob", 2300), ("Cid", 2200), ("Dan", 2100)] {
        t.register(name, Some(rating)).unwrap();
    }
    t.pair_next_round(start()).unwrap();
    t
}

fn config() -> TournamentConfig {
    TournamentConfig {
        total_rounds: 4,
        default_time_minutes: 30,
        ..Default::default()
    }
}

#[test]
fn test_check_in_needs_a_round_and_a_known_player() {
    let mut t = Tournament::new(config());
    t.register("Ann", None).unwrap();
    assert!(matches!(
        t.check_in(1, start()),
        Err(TournamentError::NoActiveRound)
    ));

    let mut t = paired_four(config());
    assert!(matches!(
        t.check_in(42, start()),
        Err(TournamentError::UnknownPlayer(42))
    ));
    t.check_in(1, start()).unwrap();
    assert_eq!(t.current_round().unwrap().arrivals.get(&1), Some(&start()));
}

#[test]
fn test_no_shows_wait_for_default_time() {
    let mut t = paired_four(config());
    let boards = t.resolve_no_shows(start() + Duration::minutes(10)).unwrap();
    assert!(boards.is_empty());
    assert_eq!(t.current_round().unwrap().pending().count(), 2);
}

#[test]
fn test_no_shows_become_forfeits() {
    let mut t = paired_four(config());
    t.check_in(1, start() + Duration::minutes(5)).unwrap();

    let boards = t.resolve_no_shows(start() + Duration::minutes(31)).unwrap();
    assert_eq!(boards, vec![1, 2]);

    let round = t.current_round().unwrap();
    assert_eq!(round.game(1).unwrap().result, Some(GameResult::WhiteWinsForfeit));
    assert_eq!(round.game(2).unwrap().result, Some(GameResult::DoubleForfeit));

    let ann = t.player(1).unwrap();
    assert_eq!(ann.score, Score::ONE);
    assert_eq!(ann.forfeit_wins, 1);
    assert!(!ann.has_played(3));
    // The absent player still has the game counted
    assert_eq!(t.player(3).unwrap().games_played, 1);
    assert_eq!(t.player(4).unwrap().score, Score::ZERO);
}

#[test]
fn test_present_players_keep_their_game() {
    let mut t = paired_four(config());
    for id in 1..=4 {
        t.check_in(id, start()).unwrap();
    }
    let boards = t.resolve_no_shows(start() + Duration::hours(2)).unwrap();
    assert!(boards.is_empty());
}

#[test]
fn test_arrival_after_default_time_counts_as_absent() {
    let mut t = paired_four(config());
    for id in [1, 2, 4] {
        t.check_in(id, start()).unwrap();
    }
    t.check_in(3, start() + Duration::minutes(45)).unwrap();

    let boards = t.resolve_no_shows(start() + Duration::minutes(50)).unwrap();
    assert_eq!(boards, vec![1]);
}

#[test]
fn test_withdrawal_forfeits_pending_game() {
    let mut t = paired_four(config());
    t.withdraw(3).unwrap();

    let round = t.current_round().unwrap();
    assert_eq!(round.game(1).unwrap().result, Some(GameResult::WhiteWinsForfeit));
    assert!(!t.player(3).unwrap().active);
    assert_eq!(t.player(1).unwrap().score, Score::ONE);

    assert!(matches!(t.withdraw(3), Err(TournamentError::PlayerInactive(3))));

    // Later rounds leave the withdrawn player out
    t.record_result(2, GameResult::Draw).unwrap();
    let round = t.pair_next_round(start() + Duration::hours(3)).unwrap();
    assert!(round.games.iter().all(|g| !g.involves(3)));
    assert_eq!(round.games.iter().filter(|g| g.is_bye()).count(), 1);
}

#[test]
fn test_withdrawal_after_result_keeps_result() {
    let mut t = paired_four(config());
    t.record_result(1, GameResult::BlackWins).unwrap();
    t.withdraw(3).unwrap();

    let round = t.current_round().unwrap();
    assert_eq!(round.game(1).unwrap().result, Some(GameResult::BlackWins));
    assert_eq!(t.player(3).unwrap().score, Score::ONE);
}

#[test]
fn test_late_entry_gets_temporary_seed() {
    let mut t = paired_four(TournamentConfig {
        missed_round_points: Score::HALF,
        ..config()
    });
    t.record_result(1, GameResult::WhiteWins).unwrap();
    t.record_result(2, GameResult::Draw).unwrap();

    let eve = t.admit_late_entry("Eve", Some(2250)).unwrap();
    let seed = |id| t.player(id).unwrap().seed;
    assert_eq!(seed(eve), 3);
    assert_eq!(seed(1), 1);
    assert_eq!(seed(2), 2);
    assert_eq!(seed(3), 4);
    assert_eq!(seed(4), 5);

    let entrant = t.player(eve).unwrap();
    assert_eq!(entrant.score, Score::HALF);
    assert!(entrant.opponents.is_empty());
    assert!(entrant.colors.is_empty());
    assert_eq!(
        entrant.late_entry,
        Some(LateEntry {
            joined_round: 2,
            missed_rounds: 1
        })
    );

    let round = t.pair_next_round(start() + Duration::hours(3)).unwrap();
    assert!(round.games.iter().any(|g| g.involves(eve)));
}

#[test]
fn test_unrated_late_entry_goes_last() {
    let mut t = paired_four(config());
    let id = t.admit_late_entry("Fay", None).unwrap();
    assert_eq!(t.player(id).unwrap().seed, 5);
    assert_eq!(t.player(4).unwrap().seed, 4);
}

#[test]
fn test_rated_late_entry_goes_before_unrated_players() {
    let mut t = Tournament::new(config());
    t.register("Ann", Some(2400)).unwrap();
    t.register("Bob", Some(2300)).unwrap();
    let gus = t.register("Gus", None).unwrap();
    t.pair_next_round(start()).unwrap();

    let hal = t.admit_late_entry("Hal", Some(2000)).unwrap();
    assert_eq!(t.player(hal).unwrap().seed, 3);
    assert_eq!(t.player(gus).unwrap().seed, 4);
    assert_eq!(t.player(2).unwrap().seed, 2);
}

#[test]
fn test_late_entry_before_round_one_is_a_registration() {
    let mut t = Tournament::new(config());
    t.register("Ann", Some(2000)).unwrap();
    let id = t.admit_late_entry("Bob", Some(2100)).unwrap();
    let bob = t.player(id).unwrap();
    assert_eq!(bob.seed, 1);
    assert!(bob.late_entry.is_none());
}
