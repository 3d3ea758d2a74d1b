use super::*;

/// Everything the dispatcher runs for a game.
#[derive(Debug)]
pub enum Job {
    /// Install a validated game, replacing whatever was there.
    Start(Game),
    /// Same lineup again with zeroed scores.
    Rematch,
    /// Roll action for the player at `seat`.
    Roll { epoch: Epoch, seat: Position },
    /// Turn advancement after a roll.
    Advance { epoch: Epoch },
}

#[async_trait::async_trait]
impl Task for Job {
    type State = Session;
    async fn run(self, session: &mut Session, handle: &Handle<Self>) {
        log::trace!("[dispatcher] running {}", self);
        match self {
            Job::Start(game) => session.start(game, handle),
            Job::Rematch => session.rematch(handle),
            Job::Roll { epoch, seat } => session.roll(epoch, seat, handle).await,
            Job::Advance { epoch } => session.advance(epoch, handle),
        }
    }
}

impl std::fmt::Display for Job {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Job::Start(game) => write!(f, "start ({} players)", game.ring().size()),
            Job::Rematch => write!(f, "rematch"),
            Job::Roll { epoch, seat } => write!(f, "roll #{} P{}", epoch, seat + 1),
            Job::Advance { epoch } => write!(f, "advance #{}", epoch),
        }
    }
}
