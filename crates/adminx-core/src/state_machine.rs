//! Mutation phase machine
//!
//! Optimistic attempts: `Idle -> AppliedLocally -> Confirmed | RolledBack`.
//! Pessimistic attempts (delete): `Idle -> AwaitingRemote -> Confirmed | Failed`.

use serde::{Deserialize, Serialize};

use crate::error::MutationError;

/// Phase of one mutation attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MutationPhase {
    /// Nothing dispatched yet
    Idle,
    /// Local state already shows the new value; remote call outstanding
    AppliedLocally,
    /// Remote call outstanding; local state untouched
    AwaitingRemote,
    /// Remote accepted; local value kept
    Confirmed,
    /// Remote rejected; local value restored
    RolledBack,
    /// Remote rejected; nothing to restore
    Failed,
}

impl MutationPhase {
    /// Whether no further transition is possible
    #[inline]
    #[must_use]
    pub fn is_terminal(self) -> bool {
        allowed_transitions(self).is_empty()
    }
}

/// Validates a phase transition.
pub fn validate_transition(from: MutationPhase, to: MutationPhase) -> Result<(), MutationError> {
    if allowed(from, to) {
        Ok(())
    } else {
        Err(MutationError::IllegalTransition { from, to })
    }
}

pub fn allowed_transitions(from: MutationPhase) -> Vec<MutationPhase> {
    use MutationPhase::*;
    match from {
        Idle => vec![AppliedLocally, AwaitingRemote],
        AppliedLocally => vec![Confirmed, RolledBack],
        AwaitingRemote => vec![Confirmed, Failed],
        Confirmed => vec![],
        RolledBack => vec![],
        Failed => vec![],
    }
}

fn allowed(from: MutationPhase, to: MutationPhase) -> bool {
    allowed_transitions(from).into_iter().any(|s| s == to)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn any_phase() -> impl Strategy<Value = MutationPhase> {
        prop_oneof![
            Just(MutationPhase::Idle),
            Just(MutationPhase::AppliedLocally),
            Just(MutationPhase::AwaitingRemote),
            Just(MutationPhase::Confirmed),
            Just(MutationPhase::RolledBack),
            Just(MutationPhase::Failed),
        ]
    }

    proptest! {
        #[test]
        fn validation_agrees_with_table(from in any_phase(), to in any_phase()) {
            prop_assert_eq!(
                validate_transition(from, to).is_ok(),
                allowed_transitions(from).contains(&to)
            );
        }

        #[test]
        fn nothing_returns_to_idle(from in any_phase()) {
            prop_assert!(validate_transition(from, MutationPhase::Idle).is_err());
        }
    }

    #[test]
    fn optimistic_path() {
        assert!(validate_transition(MutationPhase::Idle, MutationPhase::AppliedLocally).is_ok());
        assert!(validate_transition(MutationPhase::AppliedLocally, MutationPhase::Confirmed).is_ok());
        assert!(validate_transition(MutationPhase::AppliedLocally, MutationPhase::RolledBack).is_ok());

        // Optimistic attempts never end in Failed
        assert!(validate_transition(MutationPhase::AppliedLocally, MutationPhase::Failed).is_err());
    }

    #[test]
    fn pessimistic_path() {
        assert!(validate_transition(MutationPhase::Idle, MutationPhase::AwaitingRemote).is_ok());
        assert!(validate_transition(MutationPhase::AwaitingRemote, MutationPhase::Failed).is_ok());
        assert!(validate_transition(MutationPhase::AwaitingRemote, MutationPhase::RolledBack).is_err());
    }

    #[test]
    fn terminal_phases() {
        assert!(MutationPhase::Confirmed.is_terminal());
        assert!(MutationPhase::RolledBack.is_terminal());
        assert!(MutationPhase::Failed.is_terminal());
        assert!(!MutationPhase::Idle.is_terminal());
        assert!(validate_transition(MutationPhase::Confirmed, MutationPhase::Idle).is_err());
    }
}
