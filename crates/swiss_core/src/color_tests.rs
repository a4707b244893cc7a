use super::*;
use Color::{Black, White};

#[test]
fn test_fresh_player_has_no_preference() {
    assert_eq!(color_preference(&[]), ColorPreference::NONE);
    assert_eq!(color_preference(&[None]), ColorPreference::NONE);
}

#[test]
fn test_two_same_colors_is_absolute() {
    let pref = color_preference(&[Some(White), Some(White)]);
    assert_eq!(pref.color, Some(Black));
    assert_eq!(pref.strength, Strength::Absolute);
}

#[test]
fn test_bye_between_same_colors_still_absolute() {
    let pref = color_preference(&[Some(Black), None, Some(Black)]);
    assert_eq!(pref.color, Some(White));
    assert!(pref.is_absolute());
}

#[test]
fn test_unequal_counts_is_strong() {
    // W B W W B: three whites, two blacks, last two differ
    let history = [Some(White), Some(Black), Some(White), Some(White), Some(Black)];
    let pref = color_preference(&history);
    assert_eq!(pref.color, Some(Black));
    assert_eq!(pref.strength, Strength::Strong);
}

#[test]
fn test_equal_counts_is_mild_alternation() {
    let pref = color_preference(&[Some(White), Some(Black)]);
    assert_eq!(pref.color, Some(White));
    assert_eq!(pref.strength, Strength::Mild);
}

#[test]
fn test_compatible_preferences_both_honored() {
    let wants_white = ColorPreference {
        color: Some(White),
        strength: Strength::Mild,
    };
    let wants_black = ColorPreference {
        color: Some(Black),
        strength: Strength::Absolute,
    };
    let alloc = assign_colors(wants_black, wants_white, White);
    assert_eq!(alloc.higher, Black);
    assert_eq!(alloc.lower(), White);
    assert_eq!(alloc.overridden, None);
}

#[test]
fn test_stronger_preference_wins() {
    let higher = ColorPreference {
        color: Some(White),
        strength: Strength::Mild,
    };
    let lower = ColorPreference {
        color: Some(White),
        strength: Strength::Strong,
    };
    let alloc = assign_colors(higher, lower, White);
    assert_eq!(alloc.lower(), White);
    assert_eq!(alloc.overridden, Some(Strength::Mild));
}

#[test]
fn test_equal_strength_higher_ranked_wins() {
    let pref = ColorPreference {
        color: Some(Black),
        strength: Strength::Absolute,
    };
    let alloc = assign_colors(pref, pref, White);
    assert_eq!(alloc.higher, Black);
    assert_eq!(alloc.overridden, Some(Strength::Absolute));
    assert!(!absolute_compatible(pref, pref));
}

#[test]
fn test_no_preferences_use_initial_color() {
    let alloc = assign_colors(ColorPreference::NONE, ColorPreference::NONE, Black);
    assert_eq!(alloc.higher, Black);
}

#[test]
fn test_color_issues_detects_repeat_and_imbalance() {
    assert!(color_issues(&[Some(White), Some(Black), Some(White)]).is_empty());
    assert_eq!(
        color_issues(&[Some(Black), Some(White), Some(White), Some(White)]),
        vec![ColorIssue::Repeat { color: White }]
    );
    let issues = color_issues(&[Some(White), Some(White), Some(Black), Some(White), Some(White)]);
    assert!(issues.contains(&ColorIssue::Imbalance { whites: 4, blacks: 1 }));
}
