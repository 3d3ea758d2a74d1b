use super::*;
use serde::Serialize;

/// Rejected game configuration. Raised before any state is touched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum ConfigError {
    NoPlayers,
    NoRounds,
    BlankName,
    DuplicateName(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoPlayers => write!(f, "a game needs at least one player"),
            Self::NoRounds => write!(f, "a game needs at least one round"),
            Self::BlankName => write!(f, "player names cannot be blank"),
            Self::DuplicateName(s) => write!(f, "player name {} is taken", s),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Broken turn-order invariant. Fatal to the game it happens in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Violation {
    /// Ring advance examined every member without a match.
    Exhausted,
    /// Turn advancement requested after the game ended.
    Finished,
    /// Phase transition outside the state machine.
    Transition { from: Phase, step: Step },
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Exhausted => write!(f, "no eligible player left in the ring"),
            Self::Finished => write!(f, "turn advanced on a finished game"),
            Self::Transition { from, step } => write!(f, "cannot {:?} while {:?}", step, from),
        }
    }
}

impl std::error::Error for Violation {}

/// Everything the session API can refuse or report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum GameError {
    Config(ConfigError),
    Violation(Violation),
    /// Input is locked while an action is in flight.
    Locked,
    /// No game has been started yet.
    NoGame,
    /// The game already ended.
    Finished,
    /// The roll was not submitted for the player on turn.
    OutOfTurn(Position),
    /// Automated players roll on their own.
    Automated(String),
    /// The worker halted during a roll animation.
    Interrupted,
    /// The dispatcher is gone.
    Closed,
}

impl std::fmt::Display for GameError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Config(e) => write!(f, "invalid game: {}", e),
            Self::Violation(e) => write!(f, "invariant violation: {}", e),
            Self::Locked => write!(f, "input is locked"),
            Self::NoGame => write!(f, "no game in progress"),
            Self::Finished => write!(f, "the game has finished"),
            Self::OutOfTurn(p) => write!(f, "P{} is not on turn", p + 1),
            Self::Automated(s) => write!(f, "{} rolls automatically", s),
            Self::Interrupted => write!(f, "roll interrupted before it was applied"),
            Self::Closed => write!(f, "dispatcher closed"),
        }
    }
}

impl std::error::Error for GameError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Config(e) => Some(e),
            Self::Violation(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ConfigError> for GameError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

impl From<Violation> for GameError {
    fn from(e: Violation) -> Self {
        Self::Violation(e)
    }
}
