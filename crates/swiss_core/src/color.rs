//! Color preferences and color allocation.
//!
//! A player's preference for the next game is derived from the colors of the
//! games they actually played (byes and forfeits are skipped):
//! - *absolute*: the last two games had the same color
//! - *strong*: lifetime white and black counts differ
//! - *mild*: counts are equal, alternate from the last game
//! - *none*: no game played yet

use serde::{Deserialize, Serialize};

use crate::types::Color;

/// How firmly a player should receive their preferred color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strength {
    None,
    Mild,
    Strong,
    Absolute,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ColorPreference {
    /// The color the player is due, if any
    pub color: Option<Color>,
    pub strength: Strength,
}

impl ColorPreference {
    pub const NONE: ColorPreference = ColorPreference {
        color: None,
        strength: Strength::None,
    };

    pub fn is_absolute(&self) -> bool {
        self.strength == Strength::Absolute
    }
}

/// Derive the preference for the next game from a color history.
pub fn color_preference(history: &[Option<Color>]) -> ColorPreference {
    let played: Vec<Color> = history.iter().flatten().copied().collect();
    let Some(&last) = played.last() else {
        return ColorPreference::NONE;
    };

    if played.len() >= 2 && played[played.len() - 2] == last {
        return ColorPreference {
            color: Some(last.other()),
            strength: Strength::Absolute,
        };
    }

    let whites = played.iter().filter(|&&c| c == Color::White).count();
    let blacks = played.len() - whites;
    if whites != blacks {
        let lesser = if whites < blacks {
            Color::White
        } else {
            Color::Black
        };
        return ColorPreference {
            color: Some(lesser),
            strength: Strength::Strong,
        };
    }

    ColorPreference {
        color: Some(last.other()),
        strength: Strength::Mild,
    }
}

/// Colors decided for one pair.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ColorAllocation {
    /// Color given to the higher-ranked player; the other player gets the opposite
    pub higher: Color,
    /// Strength of the preference that had to be overridden, if any
    pub overridden: Option<Strength>,
}

impl ColorAllocation {
    pub fn lower(&self) -> Color {
        self.higher.other()
    }
}

/// Allocate colors for a pair. `higher` is the higher-ranked player's preference.
///
/// Compatible preferences are both honored. On a conflict the stronger
/// preference wins, and on equal strength the higher-ranked player wins.
pub fn assign_colors(
    higher: ColorPreference,
    lower: ColorPreference,
    initial_color: Color,
) -> ColorAllocation {
    match (higher.color, lower.color) {
        (None, None) => ColorAllocation {
            higher: initial_color,
            overridden: None,
        },
        (Some(h), None) => ColorAllocation {
            higher: h,
            overridden: None,
        },
        (None, Some(l)) => ColorAllocation {
            higher: l.other(),
            overridden: None,
        },
        (Some(h), Some(l)) if h != l => ColorAllocation {
            higher: h,
            overridden: None,
        },
        (Some(h), Some(_)) => {
            if lower.strength > higher.strength {
                ColorAllocation {
                    higher: h.other(),
                    overridden: Some(higher.strength),
                }
            } else {
                ColorAllocation {
                    higher: h,
                    overridden: Some(lower.strength),
                }
            }
        }
    }
}

/// Whether two preferences can both be honored under absolute rules.
pub fn absolute_compatible(a: ColorPreference, b: ColorPreference) -> bool {
    !(a.is_absolute() && b.is_absolute() && a.color == b.color)
}

// =============================================================================
// History checks
// =============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ColorIssue {
    /// White and black counts differ by more than two
    Imbalance { whites: u32, blacks: u32 },
    /// The same color three games running
    Repeat { color: Color },
}

/// Color rule breaches present in a history (usually one with the next color appended).
pub fn color_issues(history: &[Option<Color>]) -> Vec<ColorIssue> {
    let played: Vec<Color> = history.iter().flatten().copied().collect();
    let whites = played.iter().filter(|&&c| c == Color::White).count() as u32;
    let blacks = played.len() as u32 - whites;

    let mut issues = Vec::new();
    if whites.abs_diff(blacks) > 2 {
        issues.push(ColorIssue::Imbalance { whites, blacks });
    }
    if let [.., a, b, c] = played.as_slice() {
        if a == b && b == c {
            issues.push(ColorIssue::Repeat { color: *c });
        }
    }
    issues
}

#[cfg(test)]
#[path = "color_tests.rs"]
mod color_tests;
