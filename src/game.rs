use super::*;
use std::collections::HashSet;

/// One game: the turn ring, round counters and phase.
///
/// Pure state machine. Owned by the dispatcher's worker, which is the only
/// writer, so none of this is synchronized.
#[derive(Debug, Clone)]
pub struct Game {
    epoch: Epoch,
    ring: Ring<Player>,
    total: usize,
    round: usize,
    phase: Phase,
}

impl Game {
    /// Validates the configuration before building anything.
    pub fn new(players: Vec<Player>, rounds: usize) -> Result<Self, ConfigError> {
        if rounds == 0 {
            return Err(ConfigError::NoRounds);
        }
        let mut names = HashSet::new();
        for player in players.iter() {
            if player.name().trim().is_empty() {
                return Err(ConfigError::BlankName);
            }
            if !names.insert(player.name()) {
                return Err(ConfigError::DuplicateName(player.name().to_string()));
            }
        }
        Ok(Self {
            epoch: 0,
            ring: Ring::new(players)?,
            total: rounds,
            round: 1,
            phase: Phase::default(),
        })
    }
    /// Same lineup and round count with zeroed scores.
    pub fn rematch(&self) -> Self {
        let mut ring = self.ring.clone();
        ring.members_mut().for_each(Player::restart);
        ring.reset_to_first();
        Self {
            epoch: 0,
            ring,
            total: self.total,
            round: 1,
            phase: Phase::default(),
        }
    }
    pub fn with_epoch(mut self, epoch: Epoch) -> Self {
        self.epoch = epoch;
        self
    }
}

impl Game {
    pub fn epoch(&self) -> Epoch {
        self.epoch
    }
    pub fn ring(&self) -> &Ring<Player> {
        &self.ring
    }
    pub fn players(&self) -> std::slice::Iter<'_, Player> {
        self.ring.all()
    }
    pub fn current(&self) -> &Player {
        self.ring.current()
    }
    pub fn position(&self) -> Position {
        self.ring.position()
    }
    pub fn round(&self) -> usize {
        self.round
    }
    pub fn total(&self) -> usize {
        self.total
    }
    pub fn phase(&self) -> Phase {
        self.phase
    }
    pub fn is_finished(&self) -> bool {
        self.phase == Phase::Finished
    }
    /// Winner selection, once the game is over.
    pub fn outcome(&self) -> Option<Outcome> {
        self.is_finished().then(|| Outcome::decide(self.ring.all()))
    }
}

impl Game {
    /// Claims the turn for `seat`. Fails unless it is that seat's turn and
    /// the game is waiting for input.
    pub fn begin_roll(&mut self, seat: Position) -> Result<&Player, GameError> {
        match self.phase {
            Phase::Finished => return Err(GameError::Finished),
            Phase::AwaitingInput if seat != self.position() => {
                return Err(GameError::OutOfTurn(seat));
            }
            _ => {}
        }
        self.phase = self.phase.step(Step::Roll)?;
        Ok(self.ring.current())
    }
    /// Animation interrupted before anything was applied.
    pub fn abort_roll(&mut self) -> Result<(), Violation> {
        self.phase = self.phase.step(Step::Abort)?;
        Ok(())
    }
    /// Applies the final roll to the player on turn.
    pub fn apply(&mut self, roll: Roll, rule: &dyn Scoring) -> Result<Score, Violation> {
        self.phase = self.phase.step(Step::Apply)?;
        Ok(self.ring.current_mut().roll(roll, rule))
    }
    /// Marks the player on turn as done for the round, then hands the turn
    /// to the next unrolled player, resets the round, or ends the game.
    pub fn advance(&mut self) -> Result<Next, Violation> {
        if self.is_finished() {
            return Err(Violation::Finished);
        }
        self.phase.step(Step::Pass)?;
        let previous = self.ring.current().is_automated();
        self.ring.current_mut().finish();
        if self.ring.count_where(Player::is_finished) == self.ring.size() {
            self.advance_round()?;
        } else {
            if let Err(e) = self.ring.advance_to(|p| !p.is_finished()).map(|_| ()) {
                self.fault();
                return Err(e);
            }
            self.phase = self.phase.step(Step::Pass)?;
        }
        Ok(self.next(previous))
    }
    pub fn fault(&mut self) {
        if let Ok(phase) = self.phase.step(Step::Fault) {
            self.phase = phase;
        }
    }
}

impl Game {
    fn advance_round(&mut self) -> Result<(), Violation> {
        if self.round < self.total {
            self.round += 1;
            self.phase = self.phase.step(Step::Reset)?;
            self.ring.members_mut().for_each(Player::reset);
            self.ring.reset_to_first();
            self.phase = self.phase.step(Step::Resume)?;
        } else {
            self.phase = self.phase.step(Step::Finish)?;
        }
        Ok(())
    }
    fn next(&self, previous: bool) -> Next {
        match self.outcome() {
            Some(outcome) => Next::Finished(outcome),
            None if self.current().is_automated() => Next::Roll {
                seat: self.position(),
                cadence: match previous {
                    true => Cadence::Machine,
                    false => Cadence::Handoff,
                },
            },
            None => Next::Await(self.position()),
        }
    }
}
