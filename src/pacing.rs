use super::*;
use std::time::Duration;

/// Configuration for every delay the game introduces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pacing {
    /// Intermediate animation frames before the applied roll.
    pub frames: usize,
    /// Base wait between frames; frame n waits `frame + n²/3` ms.
    pub frame: Duration,
    /// Wait after a human's roll before the turn advances.
    pub grace: Duration,
    /// Wait before a bot rolls after another bot.
    pub machine: Duration,
    /// Wait before a bot rolls after a human.
    pub handoff: Duration,
}

impl Default for Pacing {
    fn default() -> Self {
        Self {
            frames: FRAMES,
            frame: Duration::from_millis(FRAME_BASE_MS),
            grace: HUMAN_GRACE,
            machine: MACHINE_DELAY,
            handoff: HANDOFF_DELAY,
        }
    }
}

impl Pacing {
    /// Short pacing for impatient terminals.
    pub fn brisk() -> Self {
        Self {
            frames: 6,
            frame: Duration::from_millis(40),
            grace: Duration::from_millis(800),
            machine: Duration::from_millis(50),
            handoff: Duration::from_millis(800),
        }
    }
    /// Wait before animation frame `n`.
    pub fn interval(&self, n: usize) -> Duration {
        self.frame + Duration::from_millis((n * n / 3) as u64)
    }
    /// Total wall-clock time the animation occupies the worker.
    pub fn animation(&self) -> Duration {
        (0..self.frames).map(|n| self.interval(n)).sum()
    }
    /// Continuation delay after a roll by the given kind of player.
    pub fn continuation(&self, automated: bool) -> Duration {
        match automated {
            true => Duration::ZERO,
            false => self.grace,
        }
    }
    /// Delay before an automated player rolls.
    pub fn chain(&self, cadence: Cadence) -> Duration {
        match cadence {
            Cadence::Machine => self.machine,
            Cadence::Handoff => self.handoff,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    #[test]
    fn default_config() {
        let pacing = Pacing::default();
        assert_eq!(pacing.frames, 19);
        assert_eq!(pacing.grace, Duration::from_secs(5));
        assert_eq!(pacing.chain(Cadence::Machine), Duration::from_millis(100));
        assert_eq!(pacing.chain(Cadence::Handoff), Duration::from_secs(5));
    }
    #[test]
    fn intervals_grow() {
        let pacing = Pacing::default();
        assert_eq!(pacing.interval(0), Duration::from_millis(100));
        assert_eq!(pacing.interval(18), Duration::from_millis(208));
        assert!((1..pacing.frames).all(|n| pacing.interval(n) >= pacing.interval(n - 1)));
    }
    #[test]
    fn animation_takes_a_couple_seconds() {
        let total = Pacing::default().animation();
        assert!(total > Duration::from_secs(2));
        assert!(total < Duration::from_secs(3));
    }
    #[test]
    fn bots_continue_immediately() {
        let pacing = Pacing::default();
        assert_eq!(pacing.continuation(true), Duration::ZERO);
        assert_eq!(pacing.continuation(false), Duration::from_secs(5));
    }
}
