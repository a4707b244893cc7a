use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::ops::{Add, AddAssign};

pub type PlayerId = u32;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    White,
    Black,
}
impl Color {
    pub fn other(self) -> Color {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FloatDirection {
    Up,
    Down,
}

// =============================================================================
// Score: half-point arithmetic
// =============================================================================

/// A cumulative score counted in half points.
///
/// Serialized as a decimal number of points (`2.5`), so tournament files stay
/// readable while arithmetic stays exact.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "f64", into = "f64")]
pub struct Score(u32);

impl Score {
    pub const ZERO: Score = Score(0);
    pub const HALF: Score = Score(1);
    pub const ONE: Score = Score(2);

    pub const fn from_halves(halves: u32) -> Self {
        Self(halves)
    }

    pub const fn halves(self) -> u32 {
        self.0
    }

    pub fn points(self) -> f64 {
        self.0 as f64 / 2.0
    }

    pub fn abs_diff(self, other: Score) -> Score {
        Score(self.0.abs_diff(other.0))
    }

    pub fn times(self, n: u32) -> Score {
        Score(self.0 * n)
    }
}

impl From<f64> for Score {
    fn from(points: f64) -> Self {
        // Negative or NaN inputs clamp to zero
        let halves = (points * 2.0).round();
        if halves.is_nan() || halves <= 0.0 {
            Score(0)
        } else {
            Score(halves as u32)
        }
    }
}

impl From<Score> for f64 {
    fn from(score: Score) -> Self {
        score.points()
    }
}

impl Add for Score {
    type Output = Score;
    fn add(self, rhs: Score) -> Score {
        Score(self.0 + rhs.0)
    }
}

impl AddAssign for Score {
    fn add_assign(&mut self, rhs: Score) {
        self.0 += rhs.0;
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 % 2 == 0 {
            write!(f, "{}", self.0 / 2)
        } else {
            write!(f, "{}.5", self.0 / 2)
        }
    }
}

// =============================================================================
// Player: persistent per-tournament record
// =============================================================================

/// Recorded when a player joins after round 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LateEntry {
    /// First round the player is eligible to be paired in
    pub joined_round: u32,
    /// Rounds already played before the player joined
    pub missed_rounds: u32,
}

/// A competitor and everything pairing needs to know about their past rounds.
///
/// Every history field carries a serde default: a record that lacks them is
/// paired as a fresh entrant instead of being rejected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub score: Score,
    /// Initial seeding rank, 1 is the strongest
    pub seed: u32,
    #[serde(default)]
    pub rating: Option<u32>,
    #[serde(default)]
    pub opponents: BTreeSet<PlayerId>,
    /// One entry per round the player took part in; `None` means no game was
    /// played over the board (bye, forfeit, unpaired)
    #[serde(default)]
    pub colors: Vec<Option<Color>>,
    /// Round number -> float direction
    #[serde(default)]
    pub floats: BTreeMap<u32, FloatDirection>,
    #[serde(default)]
    pub games_played: u32,
    #[serde(default)]
    pub byes: u32,
    #[serde(default)]
    pub forfeit_wins: u32,
    #[serde(default = "default_active")]
    pub active: bool,
    #[serde(default)]
    pub late_entry: Option<LateEntry>,
}

fn default_active() -> bool {
    true
}

impl Player {
    pub fn new(id: PlayerId, name: &str, seed: u32) -> Self {
        Self {
            id,
            name: name.to_string(),
            score: Score::ZERO,
            seed,
            rating: None,
            opponents: BTreeSet::new(),
            colors: Vec::new(),
            floats: BTreeMap::new(),
            games_played: 0,
            byes: 0,
            forfeit_wins: 0,
            active: true,
            late_entry: None,
        }
    }

    pub fn with_rating(mut self, rating: u32) -> Self {
        self.rating = Some(rating);
        self
    }

    pub fn with_score(mut self, points: f64) -> Self {
        self.score = Score::from(points);
        self
    }

    pub fn has_played(&self, other: PlayerId) -> bool {
        self.opponents.contains(&other)
    }
}

// =============================================================================
// Games: pairing output
// =============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameResult {
    WhiteWins,
    BlackWins,
    Draw,
    /// Black did not show up or withdrew
    WhiteWinsForfeit,
    /// White did not show up or withdrew
    BlackWinsForfeit,
    DoubleForfeit,
    Bye,
}

impl GameResult {
    /// True for results decided over the board.
    pub fn is_played(self) -> bool {
        matches!(
            self,
            GameResult::WhiteWins | GameResult::BlackWins | GameResult::Draw
        )
    }

    /// Standard notation, e.g. `1-0`, `1/2`, `+/-` for forfeits.
    pub fn notation(self) -> &'static str {
        match self {
            GameResult::WhiteWins => "1-0",
            GameResult::BlackWins => "0-1",
            GameResult::Draw => "1/2",
            GameResult::WhiteWinsForfeit => "+/-",
            GameResult::BlackWinsForfeit => "-/+",
            GameResult::DoubleForfeit => "-/-",
            GameResult::Bye => "bye",
        }
    }

    pub fn from_notation(s: &str) -> Option<Self> {
        match s {
            "1-0" => Some(GameResult::WhiteWins),
            "0-1" => Some(GameResult::BlackWins),
            "1/2" | "1/2-1/2" | "=" => Some(GameResult::Draw),
            "+/-" | "+-" => Some(GameResult::WhiteWinsForfeit),
            "-/+" | "-+" => Some(GameResult::BlackWinsForfeit),
            "-/-" | "--" => Some(GameResult::DoubleForfeit),
            _ => None,
        }
    }
}

/// One board of a round. A BYE has no black player and is completed on creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Game {
    pub round: u32,
    pub board: u32,
    pub white: PlayerId,
    pub black: Option<PlayerId>,
    #[serde(default)]
    pub result: Option<GameResult>,
}

impl Game {
    pub fn new(round: u32, board: u32, white: PlayerId, black: PlayerId) -> Self {
        Self {
            round,
            board,
            white,
            black: Some(black),
            result: None,
        }
    }

    pub fn bye(round: u32, board: u32, player: PlayerId) -> Self {
        Self {
            round,
            board,
            white: player,
            black: None,
            result: Some(GameResult::Bye),
        }
    }

    pub fn is_bye(&self) -> bool {
        self.black.is_none()
    }

    pub fn is_completed(&self) -> bool {
        self.result.is_some()
    }

    pub fn involves(&self, player: PlayerId) -> bool {
        self.white == player || self.black == Some(player)
    }
}

/// Two players with their allocated colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pair {
    pub white: PlayerId,
    pub black: PlayerId,
}

#[cfg(test)]
#[path = "types_tests.rs"]
mod types_tests;
