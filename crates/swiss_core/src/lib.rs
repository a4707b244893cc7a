pub mod bracket;
pub mod bye;
pub mod color;
pub mod config;
pub mod criteria;
pub mod engine;
pub mod error;
pub mod exchange;
pub mod floats;
pub mod score;
pub mod transposition;
pub mod types;

// Re-export the pairing model and the engine entry points
pub use bracket::{pair_bracket, Bracket, BracketOutcome, BracketPlayer, SearchTier};
pub use bye::{bye_candidates, bye_order};
pub use color::{assign_colors, color_issues, color_preference, ColorIssue, ColorPreference, Strength};
pub use config::PairingConfig;
pub use engine::{DutchEngine, QualityViolation, RoundPairing};
pub use error::ValidationError;
pub use floats::{record_float, FloatRecord};
pub use score::{group_by_score, rank_order, Psd};
pub use types::*;

// =============================================================================
// PairingStrategy trait: implemented by every pairing system
// =============================================================================

/// A way of pairing one round of a Swiss tournament.
///
/// The tournament lifecycle holds a strategy and never cares which system
/// sits behind it, so the Dutch engine can be swapped for another system
/// (or a scripted one in tests) without touching round bookkeeping.
pub trait PairingStrategy: Send + Sync {
    /// Short identifier stored with each paired round
    fn name(&self) -> &str;

    /// Pair round `round` of `total_rounds` from an immutable snapshot of the
    /// field.
    ///
    /// # Arguments
    /// * `players` - Every registered player; inactive ones are skipped
    /// * `round` - 1-based round to pair
    /// * `total_rounds` - Rounds the tournament was announced with
    ///
    /// # Returns
    /// The games of the round with diagnostics, or a `ValidationError` when
    /// the request itself is malformed
    fn pair_round(
        &self,
        players: &[Player],
        round: u32,
        total_rounds: u32,
    ) -> Result<RoundPairing, ValidationError>;
}
