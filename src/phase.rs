use super::*;
use serde::Serialize;

/// Where the active game is in its turn cycle.
///
/// ```text
/// AwaitingInput ──Roll──▶ Rolling ──Apply──▶ Advancing ──Pass──▶ AwaitingInput
///       ▲                    │                   │ │
///       └───────Abort────────┘                   │ └──Finish──▶ Finished
///       ▲                                        │
///       └──────Resume────── RoundReset ◀──Reset──┘
/// ```
///
/// Any non-terminal phase may `Fault`. `Finished` and `Faulted` are terminal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    #[default]
    AwaitingInput,
    Rolling,
    Advancing,
    RoundReset,
    Finished,
    Faulted,
}

/// Transition labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    Roll,
    Abort,
    Apply,
    Pass,
    Reset,
    Resume,
    Finish,
    Fault,
}

impl Phase {
    pub fn step(self, step: Step) -> Result<Self, Violation> {
        match (self, step) {
            (Self::AwaitingInput, Step::Roll) => Ok(Self::Rolling),
            (Self::Rolling, Step::Abort) => Ok(Self::AwaitingInput),
            (Self::Rolling, Step::Apply) => Ok(Self::Advancing),
            (Self::Advancing, Step::Pass) => Ok(Self::AwaitingInput),
            (Self::Advancing, Step::Reset) => Ok(Self::RoundReset),
            (Self::Advancing, Step::Finish) => Ok(Self::Finished),
            (Self::RoundReset, Step::Resume) => Ok(Self::AwaitingInput),
            (from, Step::Fault) if !from.is_terminal() => Ok(Self::Faulted),
            (from, step) => Err(Violation::Transition { from, step }),
        }
    }
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Finished | Self::Faulted)
    }
    /// Whether a roll may be submitted right now.
    pub fn accepts_roll(&self) -> bool {
        matches!(self, Self::AwaitingInput)
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AwaitingInput => write!(f, "awaiting input"),
            Self::Rolling => write!(f, "rolling"),
            Self::Advancing => write!(f, "advancing"),
            Self::RoundReset => write!(f, "round reset"),
            Self::Finished => write!(f, "finished"),
            Self::Faulted => write!(f, "faulted"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    #[test]
    fn full_turn_cycle() {
        let phase = Phase::default()
            .step(Step::Roll)
            .and_then(|p| p.step(Step::Apply))
            .and_then(|p| p.step(Step::Pass));
        assert_eq!(phase, Ok(Phase::AwaitingInput));
    }
    #[test]
    fn round_boundary() {
        let phase = Phase::Advancing
            .step(Step::Reset)
            .and_then(|p| p.step(Step::Resume));
        assert_eq!(phase, Ok(Phase::AwaitingInput));
    }
    #[test]
    fn abort_returns_to_input() {
        assert_eq!(Phase::Rolling.step(Step::Abort), Ok(Phase::AwaitingInput));
    }
    #[test]
    fn terminal_phases_reject_everything() {
        for from in [Phase::Finished, Phase::Faulted] {
            for step in [
                Step::Roll,
                Step::Abort,
                Step::Apply,
                Step::Pass,
                Step::Reset,
                Step::Resume,
                Step::Finish,
                Step::Fault,
            ] {
                assert_eq!(
                    from.step(step),
                    Err(Violation::Transition { from, step })
                );
            }
        }
    }
    #[test]
    fn no_double_roll() {
        assert!(Phase::Rolling.step(Step::Roll).is_err());
        assert!(Phase::Advancing.step(Step::Roll).is_err());
        assert!(!Phase::Advancing.accepts_roll());
    }
    #[test]
    fn anything_live_can_fault() {
        assert_eq!(Phase::Rolling.step(Step::Fault), Ok(Phase::Faulted));
        assert_eq!(Phase::RoundReset.step(Step::Fault), Ok(Phase::Faulted));
    }
}
