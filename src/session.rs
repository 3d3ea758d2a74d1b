use super::*;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use tokio::sync::mpsc::UnboundedSender;
use tokio::sync::watch;

/// Runtime knobs for a table.
#[derive(Debug, Clone, Copy, Default)]
pub struct Settings {
    pub pacing: Pacing,
    pub rule: Rule,
    /// Fixed seed for reproducible dice.
    pub seed: Option<u64>,
}

/// Outbound side of the worker: signals, snapshots and the input lock.
pub struct Feed {
    signals: UnboundedSender<Signal>,
    view: watch::Sender<Snapshot>,
    latch: Latch,
}

impl Feed {
    pub fn new(signals: UnboundedSender<Signal>, view: watch::Sender<Snapshot>, latch: Latch) -> Self {
        Self {
            signals,
            view,
            latch,
        }
    }
    fn emit(&self, signal: Signal) {
        if self.signals.send(signal).is_err() {
            log::trace!("[session] nobody is listening for signals");
        }
    }
    fn announce(&self, announcement: Announcement) {
        log::info!("[session] {}", announcement);
        self.emit(Signal::Announce(announcement));
    }
    /// Publishes the game first and only then moves the lock, so anyone who
    /// sees the lock open also sees the state that opened it.
    fn settle(&self, game: &Game, locked: bool) {
        self.view.send_replace(Snapshot::of(game, locked));
        self.latch.set(locked);
        self.emit(Signal::Lock(locked));
    }
}

/// Worker-owned state behind the dispatcher.
///
/// Holds at most one game. Every job names the epoch of the game it was
/// created for; jobs from an earlier game are dropped, which makes a reset
/// safe even while continuations of the old game are still pending.
pub struct Session {
    game: Option<Game>,
    epoch: Epoch,
    pacing: Pacing,
    scoring: Box<dyn Scoring>,
    rng: SmallRng,
    feed: Feed,
}

impl Session {
    pub fn new(settings: Settings, scoring: Box<dyn Scoring>, feed: Feed) -> Self {
        Self {
            game: None,
            epoch: 0,
            pacing: settings.pacing,
            scoring,
            rng: settings
                .seed
                .map(SmallRng::seed_from_u64)
                .unwrap_or_else(SmallRng::from_os_rng),
            feed,
        }
    }
    pub fn game(&self) -> Option<&Game> {
        self.game.as_ref()
    }
}

impl Session {
    pub fn start(&mut self, game: Game, handle: &Handle<Job>) {
        self.epoch += 1;
        let epoch = self.epoch;
        let game = self.game.insert(game.with_epoch(epoch));
        log::info!(
            "[session] game #{} with {} players over {} rounds",
            epoch,
            game.ring().size(),
            game.total()
        );
        self.feed.emit(Signal::Started { epoch });
        self.feed.announce(Announcement::Round {
            round: game.round(),
            total: game.total(),
        });
        self.feed.emit(Signal::Scores);
        let first = game.current();
        match first.is_automated() {
            true => {
                self.feed.announce(Announcement::Up(first.name().to_string()));
                self.feed.settle(game, true);
                let seat = game.position();
                if let Err(e) = handle.submit(Job::Roll { epoch, seat }) {
                    log::error!("[session] could not start game #{}: {}", epoch, e);
                }
            }
            false => {
                self.feed
                    .announce(Announcement::YourTurn(first.name().to_string()));
                self.feed.settle(game, false);
            }
        }
    }
    pub fn rematch(&mut self, handle: &Handle<Job>) {
        match self.game.as_ref().map(Game::rematch) {
            Some(game) => self.start(game, handle),
            None => {
                log::warn!("[session] rematch requested before any game");
                self.feed.emit(Signal::Fault(GameError::NoGame));
            }
        }
    }
    /// The roll action: lock input, animate, apply the final dice, then
    /// schedule the turn continuation.
    pub async fn roll(&mut self, epoch: Epoch, seat: Position, handle: &Handle<Job>) {
        let Some(game) = self.game.as_mut().filter(|g| g.epoch() == epoch) else {
            log::warn!("[session] dropping roll for stale game #{}", epoch);
            return;
        };
        let player = match game.begin_roll(seat) {
            Ok(player) => player.clone(),
            Err(e) => {
                log::warn!("[session] roll for P{} rejected: {}", seat + 1, e);
                self.feed.emit(Signal::Fault(e));
                self.feed.settle(game, Self::resting(game));
                return;
            }
        };
        self.feed.announce(Announcement::Rolling(player.name().to_string()));
        self.feed.settle(game, true);
        for n in 0..self.pacing.frames {
            tokio::select! {
                biased;
                _ = handle.halted() => {
                    log::warn!("[session] {} was interrupted mid-roll", player.name());
                    if let Err(e) = game.abort_roll() {
                        log::error!("[session] {}", e);
                    }
                    self.feed.emit(Signal::Fault(GameError::Interrupted));
                    self.feed.settle(game, Self::resting(game));
                    return;
                }
                _ = tokio::time::sleep(self.pacing.interval(n)) => {
                    self.feed.emit(Signal::Frame(Roll::sample(&mut self.rng)));
                }
            }
        }
        let roll = Roll::sample(&mut self.rng);
        let score = match game.apply(roll, self.scoring.as_ref()) {
            Ok(score) => score,
            Err(e) => return Self::corrupt(game, &self.feed, e),
        };
        log::info!("[session] {} rolled {} for {}", player.name(), roll, score);
        self.feed.emit(Signal::Rolled {
            seat,
            name: player.name().to_string(),
            roll,
            score,
        });
        self.feed.emit(Signal::Scores);
        self.feed.settle(game, true);
        let delay = self.pacing.continuation(player.is_automated());
        if let Err(e) = handle.submit_after(Job::Advance { epoch }, delay) {
            log::error!("[session] could not schedule continuation: {}", e);
        }
    }
    /// The continuation: advance the turn and decide what runs next.
    pub fn advance(&mut self, epoch: Epoch, handle: &Handle<Job>) {
        let Some(game) = self.game.as_mut().filter(|g| g.epoch() == epoch) else {
            log::warn!("[session] dropping continuation for stale game #{}", epoch);
            return;
        };
        let round = game.round();
        let next = match game.advance() {
            Ok(next) => next,
            Err(Violation::Finished) => {
                log::warn!("[session] continuation for finished game #{} ignored", epoch);
                return;
            }
            Err(e) => return Self::corrupt(game, &self.feed, e),
        };
        if game.round() != round {
            self.feed.announce(Announcement::Round {
                round: game.round(),
                total: game.total(),
            });
        }
        self.feed.emit(Signal::Scores);
        match next {
            Next::Finished(outcome) => {
                self.feed.announce(Announcement::Over(outcome));
                self.feed.settle(game, false);
            }
            Next::Await(_) => {
                self.feed
                    .announce(Announcement::YourTurn(game.current().name().to_string()));
                self.feed.settle(game, false);
            }
            Next::Roll { seat, cadence } => {
                self.feed
                    .announce(Announcement::Up(game.current().name().to_string()));
                self.feed.settle(game, true);
                let delay = self.pacing.chain(cadence);
                if let Err(e) = handle.submit_after(Job::Roll { epoch, seat }, delay) {
                    log::error!("[session] could not chain next roll: {}", e);
                }
            }
        }
    }
}

impl Session {
    /// Lock state when nothing is in flight: open for a human on turn or a
    /// game that is over, closed otherwise.
    fn resting(game: &Game) -> bool {
        match game.phase() {
            Phase::AwaitingInput => game.current().is_automated(),
            Phase::Finished | Phase::Faulted => false,
            _ => true,
        }
    }
    fn corrupt(game: &mut Game, feed: &Feed, violation: Violation) {
        log::error!("[session] game #{} corrupted: {}", game.epoch(), violation);
        game.fault();
        feed.emit(Signal::Fault(GameError::Violation(violation)));
        feed.settle(game, false);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc::UnboundedReceiver;
    use tokio::sync::mpsc::unbounded_channel;

    fn spawn() -> (Dispatcher<Job>, watch::Receiver<Snapshot>, UnboundedReceiver<Signal>) {
        let (tx, rx) = unbounded_channel();
        let (publisher, view) = watch::channel(Snapshot::default());
        let feed = Feed::new(tx, publisher, Latch::default());
        let settings = Settings {
            seed: Some(3),
            ..Settings::default()
        };
        let session = Session::new(settings, Box::new(Rule::Sum), feed);
        (Dispatcher::spawn(session), view, rx)
    }
    fn faults(rx: &mut UnboundedReceiver<Signal>) -> Vec<GameError> {
        let mut faults = Vec::new();
        while let Ok(signal) = rx.try_recv() {
            if let Signal::Fault(e) = signal {
                faults.push(e);
            }
        }
        faults
    }

    #[tokio::test(start_paused = true)]
    async fn violation_faults_the_game_for_good() {
        let (dispatcher, mut view, mut rx) = spawn();
        let game = Game::new(vec![Player::human("ana"), Player::human("bob")], 2).unwrap();
        dispatcher.submit(Job::Start(game)).unwrap();
        dispatcher.submit(Job::Advance { epoch: 1 }).unwrap();
        dispatcher.submit(Job::Roll { epoch: 1, seat: 0 }).unwrap();
        tokio::time::sleep(std::time::Duration::from_secs(10)).await;
        let snapshot = view.borrow_and_update().clone();
        assert_eq!(snapshot.phase, Phase::Faulted);
        assert!(!snapshot.locked);
        assert!(snapshot.seats.iter().all(|s| s.score == 0));
        assert_eq!(
            faults(&mut rx),
            vec![
                GameError::Violation(Violation::Transition {
                    from: Phase::AwaitingInput,
                    step: Step::Pass,
                }),
                GameError::Violation(Violation::Transition {
                    from: Phase::Faulted,
                    step: Step::Roll,
                }),
            ]
        );
        let session = dispatcher.shutdown().await.unwrap();
        assert_eq!(session.game().unwrap().phase(), Phase::Faulted);
    }
    #[tokio::test(start_paused = true)]
    async fn stale_jobs_leave_the_game_alone() {
        let (dispatcher, view, mut rx) = spawn();
        let game = Game::new(vec![Player::human("ana")], 1).unwrap();
        dispatcher.submit(Job::Start(game)).unwrap();
        dispatcher.submit(Job::Roll { epoch: 7, seat: 0 }).unwrap();
        dispatcher.submit(Job::Advance { epoch: 7 }).unwrap();
        tokio::time::sleep(std::time::Duration::from_secs(10)).await;
        assert_eq!(view.borrow().phase, Phase::AwaitingInput);
        assert!(faults(&mut rx).is_empty());
        dispatcher.shutdown().await.unwrap();
    }
}
