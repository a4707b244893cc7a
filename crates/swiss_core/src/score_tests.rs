use super::*;

fn player(id: u32, seed: u32, points: f64) -> Player {
    Player::new(id, &format!("p{id}"), seed).with_score(points)
}

#[test]
fn test_group_by_score_descending() {
    let players = vec![
        player(1, 1, 1.0),
        player(2, 2, 2.0),
        player(3, 3, 1.0),
        player(4, 4, 0.5),
        player(5, 5, 2.0),
    ];
    let groups = group_by_score(&players);
    let scores: Vec<Score> = groups.iter().map(|g| g.score).collect();
    assert_eq!(scores, vec![Score::ONE + Score::ONE, Score::ONE, Score::HALF]);
    let top: Vec<u32> = groups[0].players.iter().map(|p| p.id).collect();
    assert_eq!(top, vec![2, 5]);
}

#[test]
fn test_group_by_score_skips_withdrawn() {
    let mut withdrawn = player(2, 2, 1.0);
    withdrawn.active = false;
    let players = vec![player(1, 1, 1.0), withdrawn];
    let groups = group_by_score(&players);
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].players.len(), 1);
}

#[test]
fn test_rank_order_rating_before_seed() {
    let a = player(1, 1, 1.0).with_rating(1800);
    let b = player(2, 2, 1.0).with_rating(2000);
    let c = player(3, 3, 1.0);
    let mut ranked = vec![&c, &a, &b];
    ranked.sort_by(|x, y| rank_order(x, y));
    let ids: Vec<u32> = ranked.iter().map(|p| p.id).collect();
    assert_eq!(ids, vec![2, 1, 3], "rated players first, higher rating first");
}

#[test]
fn test_outranks_uses_score_then_seed() {
    let a = player(1, 5, 2.0);
    let b = player(2, 1, 1.5);
    let c = player(3, 2, 2.0);
    assert!(outranks(&a, &b));
    assert!(outranks(&c, &a));
    assert!(!outranks(&a, &c));
}

#[test]
fn test_psd_sorted_and_totalled() {
    let psd = calculate_psd(&[
        (Score::ONE, Score::ONE),
        (Score::from(2.0), Score::HALF),
        (Score::from(1.5), Score::ONE),
    ]);
    assert_eq!(
        psd.differences(),
        &[Score::from(1.5), Score::HALF, Score::ZERO]
    );
    assert_eq!(psd.total(), Score::from(2.0));
}

#[test]
fn test_psd_ordering_total_then_lexicographic() {
    let small = Psd::new(vec![Score::ONE, Score::ZERO]);
    let large = Psd::new(vec![Score::ONE, Score::ONE]);
    assert!(small < large);

    // Same total, the one without the big gap wins
    let spread = Psd::new(vec![Score::from(2.0), Score::ZERO]);
    let even = Psd::new(vec![Score::ONE, Score::ONE]);
    assert!(even < spread);
}

#[test]
fn test_float_difference_penalizes_moved_down_players() {
    let bracket = Score::from(2.0);
    assert_eq!(float_difference(Score::from(2.0), bracket), Score::ONE);
    assert_eq!(float_difference(Score::from(3.0), bracket), Score::from(2.0));
}

#[test]
fn test_psd_lower_bound_pairs_neighbours() {
    let scores = [Score::from(3.0), Score::from(2.0), Score::from(2.0), Score::from(1.0)];
    // 3-2 and 2-1 or 3-1 and 2-2 both total 2 points; the even split wins
    let ideal = psd_lower_bound(&scores, Score::from(1.0), 2).unwrap();
    assert_eq!(ideal.total(), Score::from(2.0));
    assert_eq!(ideal.differences(), &[Score::ONE, Score::ONE]);
    assert!(ideal < calculate_psd(&[(scores[0], scores[3]), (scores[1], scores[2])]));
    assert_eq!(psd_lower_bound(&scores, Score::from(1.0), 3), None);
}

#[test]
fn test_psd_lower_bound_with_floater() {
    let scores = [Score::from(2.0), Score::from(2.0), Score::from(2.0)];
    // One pair at zero difference, one resident floats at one point
    let ideal = psd_lower_bound(&scores, Score::from(2.0), 1).unwrap();
    assert_eq!(ideal.total(), Score::ONE);
    assert_eq!(ideal.differences(), &[Score::ONE, Score::ZERO]);
}
