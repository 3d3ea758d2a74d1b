use super::*;

/// Human-readable turn announcements.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Announcement {
    /// A player started rolling.
    Rolling(String),
    /// A human is on turn.
    YourTurn(String),
    /// A bot is on turn and will roll shortly.
    Up(String),
    /// A new round began.
    Round { round: usize, total: usize },
    /// The game ended.
    Over(Outcome),
}

impl std::fmt::Display for Announcement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Rolling(name) => write!(f, "{} is rolling...", name),
            Self::YourTurn(name) => write!(f, "{}, it's your turn!", name),
            Self::Up(name) => write!(f, "{} is up", name),
            Self::Round { round, total } => write!(f, "Round {} of {}", round, total),
            Self::Over(Outcome::Winner { name, .. }) => {
                write!(f, "The game has finished! Winner: {}", name)
            }
            Self::Over(Outcome::Undecided) => write!(f, "The game has finished!"),
        }
    }
}

/// Events pushed from the worker to the presentation layer.
/// Fire-and-forget: the core never waits on whoever renders them.
#[derive(Clone, Debug, PartialEq)]
pub enum Signal {
    /// A new game was installed.
    Started { epoch: Epoch },
    /// Intermediate animation frame.
    Frame(Roll),
    /// The roll that counts, already applied.
    Rolled {
        seat: Position,
        name: String,
        roll: Roll,
        score: Score,
    },
    Announce(Announcement),
    /// Scores changed; re-read the snapshot.
    Scores,
    /// Whether human input is locked.
    Lock(bool),
    /// Something went wrong with a submitted action.
    Fault(GameError),
}

impl std::fmt::Display for Signal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Started { epoch } => write!(f, "game #{} started", epoch),
            Self::Frame(roll) => write!(f, "{}", roll),
            Self::Rolled {
                name, roll, score, ..
            } => write!(f, "{} rolled {} (score {})", name, roll, score),
            Self::Announce(a) => write!(f, "{}", a),
            Self::Scores => write!(f, "scores updated"),
            Self::Lock(true) => write!(f, "input locked"),
            Self::Lock(false) => write!(f, "input unlocked"),
            Self::Fault(e) => write!(f, "{}", e),
        }
    }
}
