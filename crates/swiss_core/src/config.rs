//! Search bounds and defaults for the Dutch engine

use serde::{Deserialize, Serialize};

use crate::types::Color;

/// Candidates examined per bracket before the best one found is accepted
pub const DEFAULT_MAX_CANDIDATES: u64 = 25_000;

/// BYE candidates tried before settling for the best partial round
pub const DEFAULT_MAX_BYE_ATTEMPTS: usize = 8;

/// Pairs unwound from the bottom of the round when leftovers cannot be paired
pub const DEFAULT_MAX_REPAIR_DEPTH: usize = 6;

/// Pairing engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PairingConfig {
    /// Cap on transposition/exchange candidates examined for one bracket
    pub max_candidates: u64,
    /// Cap on BYE recipients tried when the player count is odd
    pub max_bye_attempts: usize,
    /// Cap on already-made pairs reopened to place leftover players
    pub max_repair_depth: usize,
    /// Color for the higher-ranked player when neither side has a preference
    pub initial_color: Color,
}

impl Default for PairingConfig {
    fn default() -> Self {
        Self {
            max_candidates: DEFAULT_MAX_CANDIDATES,
            max_bye_attempts: DEFAULT_MAX_BYE_ATTEMPTS,
            max_repair_depth: DEFAULT_MAX_REPAIR_DEPTH,
            initial_color: Color::White,
        }
    }
}
