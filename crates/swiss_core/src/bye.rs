//! BYE eligibility.
//!
//! With an odd field one player sits out. The BYE goes to whoever has had the
//! fewest BYEs, then the lowest score, then the fewest games played, then the
//! highest seeding number. A forfeit counts as a game played for both
//! players. A player never gets a second BYE while anyone who has not had one
//! is still in the field.

use std::cmp::Ordering;

use crate::types::Player;

/// `Less` means `a` is the better BYE recipient.
pub fn bye_order(a: &Player, b: &Player) -> Ordering {
    a.byes
        .cmp(&b.byes)
        .then_with(|| a.score.cmp(&b.score))
        .then_with(|| a.games_played.cmp(&b.games_played))
        .then_with(|| b.seed.cmp(&a.seed))
        .then_with(|| b.id.cmp(&a.id))
}

/// Players allowed to receive the BYE, best first.
///
/// Only players sharing the lowest BYE count qualify.
pub fn bye_candidates<'a>(players: &[&'a Player]) -> Vec<&'a Player> {
    let Some(fewest) = players.iter().filter(|p| p.active).map(|p| p.byes).min() else {
        return Vec::new();
    };
    let mut eligible: Vec<&Player> = players
        .iter()
        .copied()
        .filter(|p| p.active && p.byes == fewest)
        .collect();
    eligible.sort_by(|a, b| bye_order(a, b));
    eligible
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lowest_score_then_highest_seed() {
        let a = Player::new(1, "a", 1).with_score(1.0);
        let b = Player::new(2, "b", 2).with_score(0.0);
        let c = Player::new(3, "c", 3).with_score(0.0);
        let ranked: Vec<u32> = bye_candidates(&[&a, &b, &c]).iter().map(|p| p.id).collect();
        assert_eq!(ranked, vec![3, 2, 1]);
    }

    #[test]
    fn test_previous_bye_excludes_player() {
        let mut a = Player::new(1, "a", 1).with_score(0.0);
        a.byes = 1;
        let b = Player::new(2, "b", 2).with_score(2.0);
        let ranked: Vec<u32> = bye_candidates(&[&a, &b]).iter().map(|p| p.id).collect();
        assert_eq!(ranked, vec![2]);
    }

    #[test]
    fn test_lowest_score_wins_despite_forfeit_win() {
        let mut a = Player::new(1, "a", 1).with_score(1.0);
        a.forfeit_wins = 1;
        a.games_played = 2;
        let b = Player::new(2, "b", 2).with_score(1.5);
        assert_eq!(bye_order(&a, &b), Ordering::Less);
    }

    #[test]
    fn test_more_games_played_moves_player_down() {
        // Equal score, `a` has an extra forfeited game on record
        let mut a = Player::new(1, "a", 1).with_score(1.0);
        a.games_played = 2;
        let mut b = Player::new(2, "b", 2).with_score(1.0);
        b.games_played = 1;
        let ranked: Vec<u32> = bye_candidates(&[&a, &b]).iter().map(|p| p.id).collect();
        assert_eq!(ranked, vec![2, 1]);
    }

    #[test]
    fn test_everyone_byed_falls_back_to_all() {
        let mut a = Player::new(1, "a", 1);
        let mut b = Player::new(2, "b", 2);
        a.byes = 1;
        b.byes = 1;
        assert_eq!(bye_candidates(&[&a, &b]).len(), 2);
    }
}
