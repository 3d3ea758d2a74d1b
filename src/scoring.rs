use super::*;
use serde::Serialize;

/// Turns a roll and the roller's prior score into their new score.
/// Implementations must be pure; the session calls them exactly once per roll.
pub trait Scoring: Send + Sync {
    fn score(&self, prior: Score, roll: Roll) -> Score;
}

/// Built-in scoring rules.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum Rule {
    /// Add the sum of both dice.
    #[default]
    Sum,
    /// Double ones wipe the score; any other double counts twice.
    SnakeEyes,
}

impl Scoring for Rule {
    fn score(&self, prior: Score, roll: Roll) -> Score {
        match self {
            Self::Sum => prior.saturating_add(roll.total()),
            Self::SnakeEyes if roll.is_snake_eyes() => 0,
            Self::SnakeEyes if roll.is_double() => prior.saturating_add(2 * roll.total()),
            Self::SnakeEyes => prior.saturating_add(roll.total()),
        }
    }
}

impl std::fmt::Display for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sum => write!(f, "sum"),
            Self::SnakeEyes => write!(f, "snake-eyes"),
        }
    }
}
