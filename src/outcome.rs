use super::*;
use serde::Serialize;

/// Result of a finished game. Ties are reported, never broken.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Outcome {
    Winner { name: String, score: Score },
    Undecided,
}

impl Outcome {
    /// The strictly highest score wins; anything else is undecided.
    pub fn decide<'a, I>(players: I) -> Self
    where
        I: IntoIterator<Item = &'a Player>,
    {
        let mut best: Option<&Player> = None;
        let mut tied = false;
        for player in players {
            match best.map(Player::score) {
                Some(top) if player.score() == top => tied = true,
                Some(top) if player.score() < top => {}
                _ => {
                    best = Some(player);
                    tied = false;
                }
            }
        }
        match (best, tied) {
            (Some(p), false) => Self::Winner {
                name: p.name().to_string(),
                score: p.score(),
            },
            _ => Self::Undecided,
        }
    }
    pub fn winner(&self) -> Option<&str> {
        match self {
            Self::Winner { name, .. } => Some(name),
            Self::Undecided => None,
        }
    }
}

/// How quickly an automated continuation follows the previous roll.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Cadence {
    /// Previous roller was a bot as well.
    Machine,
    /// Previous roller was a human who should get to read the result.
    Handoff,
}

/// What the dispatcher should do after a turn advanced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Next {
    /// An automated player is on turn and rolls on their own.
    Roll { seat: Position, cadence: Cadence },
    /// A human is on turn; wait for input.
    Await(Position),
    Finished(Outcome),
}
