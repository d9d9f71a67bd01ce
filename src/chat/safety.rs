// Safety follow-up state
//
// Tracks, per conversation session, whether the previous turn triggered a
// crisis. Owned by one subject's session and never shared across subjects.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Per-session safety follow-up state.
///
/// `AwaitingConfirmation` carries the creation timestamp of the triggering
/// crisis event, which identifies the record to resolve when the user
/// confirms they are safe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SafetyState {
    #[default]
    Normal,
    AwaitingConfirmation {
        crisis_at: DateTime<Utc>,
    },
}

impl SafetyState {
    pub fn is_awaiting(&self) -> bool {
        matches!(self, SafetyState::AwaitingConfirmation { .. })
    }

    /// Timestamp of the crisis event pending confirmation, if any.
    pub fn pending_crisis_at(&self) -> Option<DateTime<Utc>> {
        match self {
            SafetyState::Normal => None,
            SafetyState::AwaitingConfirmation { crisis_at } => Some(*crisis_at),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_normal() {
        let state = SafetyState::default();
        assert!(!state.is_awaiting());
        assert!(state.pending_crisis_at().is_none());
    }

    #[test]
    fn test_awaiting_carries_event_key() {
        let at = Utc::now();
        let state = SafetyState::AwaitingConfirmation { crisis_at: at };
        assert!(state.is_awaiting());
        assert_eq!(state.pending_crisis_at(), Some(at));
    }
}
