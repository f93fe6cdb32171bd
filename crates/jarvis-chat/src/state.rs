//! Submission cycle phases and the presentation flags around them.
//!
//! One submission cycle runs:
//! - Idle -> AwaitingResolution (input accepted, resolver suspended)
//! - AwaitingResolution -> Responding (reply appended, voice playback)
//! - Responding -> Idle (playback finished)
//! - AwaitingResolution -> Idle (reply not spoken)
//! - Responding -> AwaitingResolution (new input cuts off playback)

use std::fmt;

use serde::{Deserialize, Serialize};

/// Where the controller is in a submission cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CyclePhase {
    Idle,
    AwaitingResolution,
    Responding,
}

impl fmt::Display for CyclePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CyclePhase::Idle => write!(f, "Idle"),
            CyclePhase::AwaitingResolution => write!(f, "AwaitingResolution"),
            CyclePhase::Responding => write!(f, "Responding"),
        }
    }
}

impl CyclePhase {
    /// Derive the phase from the busy and speaking flags.
    pub fn from_flags(loading: bool, speaking: bool) -> Self {
        if loading {
            CyclePhase::AwaitingResolution
        } else if speaking {
            CyclePhase::Responding
        } else {
            CyclePhase::Idle
        }
    }

    pub fn can_transition_to(&self, target: &CyclePhase) -> bool {
        matches!(
            (self, target),
            (CyclePhase::Idle, CyclePhase::AwaitingResolution)
                | (CyclePhase::AwaitingResolution, CyclePhase::Responding)
                | (CyclePhase::Responding, CyclePhase::Idle)
                | (CyclePhase::AwaitingResolution, CyclePhase::Idle)
                | (CyclePhase::Responding, CyclePhase::AwaitingResolution)
        )
    }

    /// Whether new input is accepted in this phase.
    pub fn accepts_input(&self) -> bool {
        !matches!(self, CyclePhase::AwaitingResolution)
    }
}

/// Panel visibility. Keyboard and protocols panel are mutually exclusive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UiState {
    pub workbench_open: bool,
    pub keyboard_visible: bool,
    pub protocols_visible: bool,
}

impl UiState {
    pub fn toggle_keyboard(&mut self) -> bool {
        self.keyboard_visible = !self.keyboard_visible;
        if self.keyboard_visible {
            self.protocols_visible = false;
        }
        self.keyboard_visible
    }

    pub fn toggle_protocols(&mut self) -> bool {
        self.protocols_visible = !self.protocols_visible;
        if self.protocols_visible {
            self.keyboard_visible = false;
        }
        self.protocols_visible
    }

    pub fn hide_protocols(&mut self) {
        self.protocols_visible = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_from_flags() {
        assert_eq!(CyclePhase::from_flags(false, false), CyclePhase::Idle);
        assert_eq!(
            CyclePhase::from_flags(true, false),
            CyclePhase::AwaitingResolution
        );
        assert_eq!(CyclePhase::from_flags(false, true), CyclePhase::Responding);
        // Loading dominates while a new cycle cuts off playback.
        assert_eq!(
            CyclePhase::from_flags(true, true),
            CyclePhase::AwaitingResolution
        );
    }

    #[test]
    fn test_valid_transitions() {
        assert!(CyclePhase::Idle.can_transition_to(&CyclePhase::AwaitingResolution));
        assert!(CyclePhase::AwaitingResolution.can_transition_to(&CyclePhase::Responding));
        assert!(CyclePhase::Responding.can_transition_to(&CyclePhase::Idle));
        assert!(CyclePhase::Responding.can_transition_to(&CyclePhase::AwaitingResolution));
    }

    #[test]
    fn test_invalid_transitions() {
        assert!(!CyclePhase::Idle.can_transition_to(&CyclePhase::Responding));
        assert!(!CyclePhase::Idle.can_transition_to(&CyclePhase::Idle));
        assert!(!CyclePhase::AwaitingResolution
            .can_transition_to(&CyclePhase::AwaitingResolution));
    }

    #[test]
    fn test_only_awaiting_resolution_rejects_input() {
        assert!(CyclePhase::Idle.accepts_input());
        assert!(CyclePhase::Responding.accepts_input());
        assert!(!CyclePhase::AwaitingResolution.accepts_input());
    }

    #[test]
    fn test_phase_display() {
        assert_eq!(CyclePhase::AwaitingResolution.to_string(), "AwaitingResolution");
    }

    #[test]
    fn test_keyboard_and_protocols_exclusive() {
        let mut ui = UiState::default();
        assert!(ui.toggle_protocols());
        assert!(ui.toggle_keyboard());
        assert!(!ui.protocols_visible);

        assert!(ui.toggle_protocols());
        assert!(!ui.keyboard_visible);

        assert!(!ui.toggle_protocols());
        assert!(!ui.keyboard_visible);
    }
}
