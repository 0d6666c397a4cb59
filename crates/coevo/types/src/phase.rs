use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle of the evolution controller.
///
/// Legal transitions: `Configuring -> Running -> Finished`, and
/// `Finished -> Configuring` via reset. Everything else is a contract
/// violation reported as [`PhaseError`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RunPhase {
    #[default]
    Configuring,
    Running,
    Finished,
}

impl RunPhase {
    pub fn is_running(&self) -> bool {
        matches!(self, RunPhase::Running)
    }

    /// Whether moving to `next` is a legal lifecycle transition.
    pub fn can_transition(&self, next: RunPhase) -> bool {
        matches!(
            (self, next),
            (RunPhase::Configuring, RunPhase::Running)
                | (RunPhase::Running, RunPhase::Finished)
                | (RunPhase::Finished, RunPhase::Configuring)
        )
    }
}

impl fmt::Display for RunPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RunPhase::Configuring => "CONFIGURING",
            RunPhase::Running => "RUNNING",
            RunPhase::Finished => "FINISHED",
        };
        f.write_str(name)
    }
}

/// Lifecycle contract violations.
#[derive(Debug, thiserror::Error)]
pub enum PhaseError {
    #[error("invalid transition from {from} to {to}")]
    InvalidTransition { from: RunPhase, to: RunPhase },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn legal_transitions() {
        assert!(RunPhase::Configuring.can_transition(RunPhase::Running));
        assert!(RunPhase::Running.can_transition(RunPhase::Finished));
        assert!(RunPhase::Finished.can_transition(RunPhase::Configuring));
    }

    #[test]
    fn illegal_transitions() {
        assert!(!RunPhase::Running.can_transition(RunPhase::Running));
        assert!(!RunPhase::Finished.can_transition(RunPhase::Running));
        assert!(!RunPhase::Configuring.can_transition(RunPhase::Finished));
    }

    #[test]
    fn phase_serializes_upper_case() {
        let json = serde_json::to_string(&RunPhase::Running).unwrap();
        assert_eq!(json, "\"RUNNING\"");
    }

    #[test]
    fn error_display_names_both_phases() {
        let err = PhaseError::InvalidTransition {
            from: RunPhase::Running,
            to: RunPhase::Running,
        };
        assert!(format!("{}", err).contains("RUNNING"));
    }
}
