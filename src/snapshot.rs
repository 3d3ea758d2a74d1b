use super::*;
use serde::Serialize;

/// One row of the scoreboard.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Seat {
    pub name: String,
    pub score: Score,
    pub status: Status,
    pub automated: bool,
}

impl From<&Player> for Seat {
    fn from(player: &Player) -> Self {
        Self {
            name: player.name().to_string(),
            score: player.score(),
            status: player.status(),
            automated: player.is_automated(),
        }
    }
}

/// Read-only copy of the active game, republished after every mutation.
/// This is the whole query surface available to presentation code.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Snapshot {
    pub epoch: Epoch,
    pub started: bool,
    pub seats: Vec<Seat>,
    pub current: Position,
    pub round: usize,
    pub total: usize,
    pub phase: Phase,
    pub finished: bool,
    pub locked: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outcome: Option<Outcome>,
}

impl Snapshot {
    pub fn of(game: &Game, locked: bool) -> Self {
        Self {
            epoch: game.epoch(),
            started: true,
            seats: game.players().map(Seat::from).collect(),
            current: game.position(),
            round: game.round(),
            total: game.total(),
            phase: game.phase(),
            finished: game.is_finished(),
            locked,
            outcome: game.outcome(),
        }
    }
    /// The player on turn, if a game is running.
    pub fn on_turn(&self) -> Option<&Seat> {
        self.started.then(|| self.seats.get(self.current)).flatten()
    }
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).expect("serialize snapshot")
    }
}
