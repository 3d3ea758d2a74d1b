use super::*;
use tokio::sync::mpsc::UnboundedSender;
use tokio::sync::watch;

/// Explicitly owned game session.
///
/// The only way in from the presentation layer: start a game, submit the
/// human roll on turn, read snapshots. All mutation is forwarded to the
/// dispatcher's single worker; nothing here touches game state directly.
pub struct Table {
    dispatcher: Dispatcher<Job>,
    latch: Latch,
    view: watch::Receiver<Snapshot>,
}

impl Table {
    /// Must be called within a tokio runtime.
    pub fn new(settings: Settings, signals: UnboundedSender<Signal>) -> Self {
        Self::with_scoring(settings, Box::new(settings.rule), signals)
    }
    pub fn with_scoring(
        settings: Settings,
        scoring: Box<dyn Scoring>,
        signals: UnboundedSender<Signal>,
    ) -> Self {
        let latch = Latch::default();
        let (publisher, view) = watch::channel(Snapshot::default());
        let feed = Feed::new(signals, publisher, latch.clone());
        let session = Session::new(settings, scoring, feed);
        Self {
            dispatcher: Dispatcher::spawn(session),
            latch,
            view,
        }
    }
}

impl Table {
    /// Validates the lineup synchronously, then installs it on the worker.
    /// Jobs still pending for a previous game are discarded when they run.
    pub fn start(&self, players: Vec<Player>, rounds: usize) -> Result<(), GameError> {
        let game = Game::new(players, rounds)?;
        log::debug!("[table] starting {} players over {} rounds", game.ring().size(), rounds);
        self.latch.set(true);
        self.dispatcher.submit(Job::Start(game))
    }
    /// Plays the last lineup again from zero.
    pub fn replay(&self) -> Result<(), GameError> {
        if !self.snapshot().started {
            return Err(GameError::NoGame);
        }
        self.latch.set(true);
        self.dispatcher.submit(Job::Rematch)
    }
    /// Submits the roll of the human on turn. Refused while input is locked,
    /// so a double click cannot queue a second roll.
    pub fn roll(&self) -> Result<(), GameError> {
        if !self.latch.engage() {
            log::warn!("[table] roll refused while input is locked");
            return Err(GameError::Locked);
        }
        let snapshot = self.snapshot();
        let rejected = match snapshot.on_turn() {
            None => Some(GameError::NoGame),
            Some(_) if snapshot.finished => Some(GameError::Finished),
            Some(_) if !snapshot.phase.accepts_roll() => Some(GameError::Violation(Violation::Transition {
                from: snapshot.phase,
                step: Step::Roll,
            })),
            Some(seat) if seat.automated => Some(GameError::Automated(seat.name.clone())),
            Some(_) => None,
        };
        if let Some(e) = rejected {
            log::warn!("[table] roll refused: {}", e);
            self.latch.set(false);
            return Err(e);
        }
        log::debug!("[table] roll submitted for P{}", snapshot.current + 1);
        self.dispatcher
            .submit(Job::Roll {
                epoch: snapshot.epoch,
                seat: snapshot.current,
            })
            .inspect_err(|_| self.latch.set(false))
    }
}

impl Table {
    pub fn snapshot(&self) -> Snapshot {
        self.view.borrow().clone()
    }
    /// Change notifications for the snapshot.
    pub fn watch(&self) -> watch::Receiver<Snapshot> {
        self.view.clone()
    }
    pub fn is_locked(&self) -> bool {
        self.latch.is_locked()
    }
    pub fn halter(&self) -> Halt {
        self.dispatcher.halter()
    }
    /// Stops the worker and returns its session.
    pub async fn close(self) -> Option<Session> {
        self.dispatcher.shutdown().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::sync::mpsc::UnboundedReceiver;
    use tokio::sync::mpsc::unbounded_channel;
    use tokio::time::Instant;

    fn table() -> (Table, UnboundedReceiver<Signal>) {
        let (tx, rx) = unbounded_channel();
        let settings = Settings {
            seed: Some(42),
            ..Settings::default()
        };
        (Table::new(settings, tx), rx)
    }
    fn drain(rx: &mut UnboundedReceiver<Signal>) -> Vec<Signal> {
        let mut signals = Vec::new();
        while let Ok(signal) = rx.try_recv() {
            signals.push(signal);
        }
        signals
    }
    fn rolls(signals: &[Signal]) -> Vec<String> {
        signals
            .iter()
            .filter_map(|s| match s {
                Signal::Rolled { name, .. } => Some(name.clone()),
                _ => None,
            })
            .collect()
    }
    async fn until<F>(table: &Table, f: F) -> Snapshot
    where
        F: Fn(&Snapshot) -> bool,
    {
        let mut view = table.watch();
        let snapshot = view.wait_for(|s| f(s)).await.unwrap().clone();
        snapshot
    }

    struct Flat;
    impl Scoring for Flat {
        fn score(&self, prior: Score, _: Roll) -> Score {
            prior + 1
        }
    }

    #[tokio::test(start_paused = true)]
    async fn bad_configuration_leaves_state_alone() {
        let (table, _rx) = table();
        assert_eq!(
            table.start(vec![], 2),
            Err(GameError::Config(ConfigError::NoPlayers))
        );
        assert_eq!(
            table.start(vec![Player::human("ana")], 0),
            Err(GameError::Config(ConfigError::NoRounds))
        );
        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(table.snapshot(), Snapshot::default());
        assert!(!table.is_locked());
    }
    #[tokio::test(start_paused = true)]
    async fn bots_play_n_times_r_rolls() {
        let (table, mut rx) = table();
        let lineup = vec![Player::bot("hal"), Player::bot("eve"), Player::bot("max")];
        table.start(lineup, 3).unwrap();
        let done = until(&table, |s| s.finished).await;
        let signals = drain(&mut rx);
        assert_eq!(rolls(&signals).len(), 9);
        assert_eq!(
            rolls(&signals)[..3],
            ["hal".to_string(), "eve".to_string(), "max".to_string()]
        );
        assert_eq!(done.round, 3);
        assert!(!done.locked);
        assert!(done.seats.iter().all(|s| s.status == Status::Finished));
        let announced = signals.iter().rev().find_map(|s| match s {
            Signal::Announce(Announcement::Over(outcome)) => Some(outcome.clone()),
            _ => None,
        });
        assert_eq!(announced, done.outcome);
    }
    #[tokio::test(start_paused = true)]
    async fn winner_is_the_unique_top_score() {
        let (table, _rx) = table();
        table
            .start(vec![Player::bot("hal"), Player::bot("eve")], 5)
            .unwrap();
        let done = until(&table, |s| s.finished).await;
        let top = done.seats.iter().map(|s| s.score).max().unwrap();
        let leaders = done.seats.iter().filter(|s| s.score == top).collect::<Vec<_>>();
        match done.outcome.unwrap() {
            Outcome::Winner { name, score } => {
                assert_eq!(leaders.len(), 1);
                assert_eq!(leaders[0].name, name);
                assert_eq!(score, top);
            }
            Outcome::Undecided => assert!(leaders.len() > 1),
        }
    }
    #[tokio::test(start_paused = true)]
    async fn ties_are_reported_not_broken() {
        let (tx, mut rx) = unbounded_channel();
        let table = Table::with_scoring(Settings::default(), Box::new(Flat), tx);
        table
            .start(vec![Player::bot("hal"), Player::bot("eve")], 2)
            .unwrap();
        let done = until(&table, |s| s.finished).await;
        assert_eq!(done.outcome, Some(Outcome::Undecided));
        assert!(drain(&mut rx).contains(&Signal::Announce(Announcement::Over(
            Outcome::Undecided
        ))));
    }
    #[tokio::test(start_paused = true)]
    async fn bot_first_then_human_waits() {
        let (table, mut rx) = table();
        table
            .start(vec![Player::bot("hal"), Player::human("ana")], 2)
            .unwrap();
        until(&table, |s| s.current == 1 && !s.locked).await;
        tokio::time::sleep(Duration::from_secs(120)).await;
        let snapshot = table.snapshot();
        assert_eq!(rolls(&drain(&mut rx)), vec!["hal".to_string()]);
        assert_eq!(snapshot.current, 1);
        assert_eq!(snapshot.phase, Phase::AwaitingInput);
        assert_eq!(snapshot.seats[0].status, Status::Finished);
        assert!(!snapshot.locked);
        assert!(!table.is_locked());
    }
    #[tokio::test(start_paused = true)]
    async fn human_roll_hands_off_to_bot_with_delays() {
        let (table, mut rx) = table();
        table
            .start(vec![Player::human("ana"), Player::bot("hal")], 1)
            .unwrap();
        until(&table, |s| s.started && !s.locked).await;
        table.roll().unwrap();
        for _ in 0..5 {
            assert_eq!(table.roll(), Err(GameError::Locked));
        }
        until(&table, |s| s.seats[0].score > 0).await;
        let rolled = Instant::now();
        until(&table, |s| s.current == 1).await;
        let advanced = Instant::now();
        assert!(advanced - rolled >= Duration::from_secs(5));
        assert_eq!(table.roll(), Err(GameError::Locked));
        until(&table, |s| s.current == 1 && s.phase == Phase::Rolling).await;
        assert!(Instant::now() - advanced >= Duration::from_secs(5));
        let done = until(&table, |s| s.finished).await;
        assert_eq!(rolls(&drain(&mut rx)), vec!["ana".to_string(), "hal".to_string()]);
        assert!(done.seats.iter().all(|s| s.status == Status::Finished));
    }
    #[tokio::test(start_paused = true)]
    async fn animation_frames_precede_the_applied_roll() {
        let (table, mut rx) = table();
        table.start(vec![Player::human("ana")], 1).unwrap();
        until(&table, |s| s.started && !s.locked).await;
        table.roll().unwrap();
        until(&table, |s| s.finished).await;
        let signals = drain(&mut rx);
        let frames = signals
            .iter()
            .take_while(|s| !matches!(s, Signal::Rolled { .. }))
            .filter(|s| matches!(s, Signal::Frame(_)))
            .count();
        assert_eq!(frames, FRAMES);
        assert!(signals.contains(&Signal::Announce(Announcement::Rolling("ana".into()))));
    }
    #[tokio::test(start_paused = true)]
    async fn finished_game_refuses_rolls() {
        let (table, _rx) = table();
        table.start(vec![Player::human("solo")], 1).unwrap();
        until(&table, |s| s.started && !s.locked).await;
        table.roll().unwrap();
        until(&table, |s| s.finished).await;
        assert_eq!(table.roll(), Err(GameError::Finished));
        assert!(!table.is_locked());
    }
    #[tokio::test(start_paused = true)]
    async fn faulted_game_refuses_rolls_up_front() {
        let (table, mut rx) = table();
        table.start(vec![Player::human("ana")], 1).unwrap();
        until(&table, |s| s.started && !s.locked).await;
        table.dispatcher.submit(Job::Advance { epoch: 1 }).unwrap();
        until(&table, |s| s.phase == Phase::Faulted).await;
        let faults = |signals: Vec<Signal>| {
            signals
                .into_iter()
                .filter(|s| matches!(s, Signal::Fault(_)))
                .count()
        };
        assert_eq!(faults(drain(&mut rx)), 1);
        assert_eq!(
            table.roll(),
            Err(GameError::Violation(Violation::Transition {
                from: Phase::Faulted,
                step: Step::Roll,
            }))
        );
        assert!(!table.is_locked());
        tokio::time::sleep(Duration::from_secs(10)).await;
        assert_eq!(faults(drain(&mut rx)), 0);
    }
    #[tokio::test(start_paused = true)]
    async fn roll_before_start_is_refused() {
        let (table, _rx) = table();
        assert_eq!(table.roll(), Err(GameError::NoGame));
        assert_eq!(table.replay(), Err(GameError::NoGame));
        assert!(!table.is_locked());
    }
    #[tokio::test(start_paused = true)]
    async fn restart_discards_stale_continuations() {
        let (table, mut rx) = table();
        table
            .start(vec![Player::human("ana"), Player::human("bob")], 2)
            .unwrap();
        until(&table, |s| s.started && !s.locked).await;
        table.roll().unwrap();
        until(&table, |s| s.phase == Phase::Rolling).await;
        table.start(vec![Player::human("zoe")], 1).unwrap();
        tokio::time::sleep(Duration::from_secs(30)).await;
        let snapshot = table.snapshot();
        assert_eq!(snapshot.epoch, 2);
        assert_eq!(snapshot.seats.len(), 1);
        assert_eq!(snapshot.seats[0].status, Status::Unrolled);
        assert_eq!(snapshot.phase, Phase::AwaitingInput);
        assert!(!snapshot.locked);
        assert!(!drain(&mut rx).iter().any(|s| matches!(s, Signal::Fault(_))));
    }
    #[tokio::test(start_paused = true)]
    async fn replay_zeroes_scores_and_plays_again() {
        let (table, mut rx) = table();
        table.start(vec![Player::bot("hal")], 2).unwrap();
        until(&table, |s| s.finished).await;
        table.replay().unwrap();
        let fresh = until(&table, |s| s.epoch == 2).await;
        assert_eq!(fresh.round, 1);
        let done = until(&table, |s| s.epoch == 2 && s.finished).await;
        assert_eq!(done.round, 2);
        assert_eq!(rolls(&drain(&mut rx)).len(), 4);
    }
    #[tokio::test(start_paused = true)]
    async fn halt_mid_animation_keeps_score() {
        let (table, mut rx) = table();
        table.start(vec![Player::human("ana")], 1).unwrap();
        until(&table, |s| s.started && !s.locked).await;
        table.roll().unwrap();
        until(&table, |s| s.phase == Phase::Rolling).await;
        tokio::time::sleep(Duration::from_millis(500)).await;
        table.halter().halt();
        let snapshot = until(&table, |s| s.phase == Phase::AwaitingInput).await;
        assert_eq!(snapshot.seats[0].score, 0);
        assert_eq!(snapshot.seats[0].status, Status::Unrolled);
        assert!(drain(&mut rx).contains(&Signal::Fault(GameError::Interrupted)));
        let session = table.close().await.unwrap();
        assert_eq!(session.game().unwrap().current().score(), 0);
    }
}
