use super::*;
use serde::Serialize;

/// Per-round progress of a player.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    #[default]
    Unrolled,
    Finished,
}

/// A seat in the game: identity, running score and round status.
/// Whether the seat is automated is fixed for the lifetime of the game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Player {
    name: String,
    score: Score,
    status: Status,
    automated: bool,
}

impl Player {
    pub fn human(name: impl Into<String>) -> Self {
        Self::new(name, false)
    }
    pub fn bot(name: impl Into<String>) -> Self {
        Self::new(name, true)
    }
    pub fn new(name: impl Into<String>, automated: bool) -> Self {
        Self {
            name: name.into(),
            score: 0,
            status: Status::Unrolled,
            automated,
        }
    }
    pub fn name(&self) -> &str {
        &self.name
    }
    pub fn score(&self) -> Score {
        self.score
    }
    pub fn status(&self) -> Status {
        self.status
    }
    pub fn is_automated(&self) -> bool {
        self.automated
    }
    pub fn is_finished(&self) -> bool {
        self.status == Status::Finished
    }
    /// Applies a roll under the given rule.
    pub fn roll(&mut self, roll: Roll, rule: &dyn Scoring) -> Score {
        self.score = rule.score(self.score, roll);
        self.score
    }
    pub fn finish(&mut self) {
        self.status = Status::Finished;
    }
    /// Start of a new round.
    pub fn reset(&mut self) {
        self.status = Status::Unrolled;
    }
    /// Start of a new game with the same lineup.
    pub fn restart(&mut self) {
        self.score = 0;
        self.status = Status::Unrolled;
    }
}

impl std::fmt::Display for Player {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.automated {
            true => write!(f, "{} (cpu)", self.name),
            false => write!(f, "{}", self.name),
        }
    }
}

#[cfg(test)]
impl Player {
    pub fn with_score(mut self, score: Score) -> Self {
        self.score = score;
        self
    }
}
