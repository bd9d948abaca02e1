use super::error::{StateError, StateResult};
use super::{event::StateTransition, ShellEvent, ShellState};

#[derive(Debug)]
pub struct StateMachine {
    state: ShellState,
    transition_history: Vec<StateTransition>,
}

impl StateMachine {
    pub fn new() -> Self {
        Self {
            state: ShellState::default(),
            transition_history: Vec::new(),
        }
    }

    pub fn state(&self) -> ShellState {
        self.state
    }

    pub fn can_transition(&self, event: ShellEvent) -> bool {
        self.next_state(event).is_some()
    }

    pub fn next_state(&self, event: ShellEvent) -> Option<ShellState> {
        use ShellEvent::*;
        match (self.state, event) {
            (ShellState::Live, OpenExport | ToggleExport) => Some(ShellState::Configuring),
            (ShellState::Configuring, OpenExport) => Some(ShellState::Configuring),
            (ShellState::Configuring, ToggleExport | CancelExport) => Some(ShellState::Live),
            (ShellState::Configuring, ConfirmExport) => Some(ShellState::Exporting),
            (ShellState::Exporting, FinishExport) => Some(ShellState::Configuring),
            (ShellState::Exporting, CancelExport) => Some(ShellState::Live),
            _ => None,
        }
    }

    pub fn transition(&mut self, event: ShellEvent) -> StateResult<ShellState> {
        tracing::debug!(from = ?self.state, event = ?event, "request state transition");
        let next = self.next_state(event).ok_or_else(|| {
            let from = self.state;
            tracing::warn!(from = ?from, event = ?event, "invalid state transition requested");
            StateError::InvalidStateTransition { from, event }
        })?;

        let record = StateTransition::new(self.state, event, next);
        self.state = next;
        self.transition_history.push(record);

        Ok(self.state)
    }

    pub fn history(&self) -> &[StateTransition] {
        &self.transition_history
    }
}

impl Default for StateMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for StateMachine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ShellState::{:?}", self.state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn can_transition_tracks_valid_and_invalid_events() {
        let mut machine = StateMachine::new();
        assert!(machine.can_transition(ShellEvent::OpenExport));
        assert!(machine.can_transition(ShellEvent::ToggleExport));
        assert!(!machine.can_transition(ShellEvent::ConfirmExport));
        assert!(!machine.can_transition(ShellEvent::FinishExport));

        let _ = machine
            .transition(ShellEvent::OpenExport)
            .expect("live -> configuring should transition");

        assert!(machine.can_transition(ShellEvent::ConfirmExport));
        assert!(machine.can_transition(ShellEvent::CancelExport));
        assert!(!machine.can_transition(ShellEvent::FinishExport));
    }

    #[test]
    fn toggle_flips_modal_visibility() {
        let mut machine = StateMachine::new();
        assert_eq!(
            machine.transition(ShellEvent::ToggleExport).unwrap(),
            ShellState::Configuring
        );
        assert!(machine.state().export_modal_visible());
        assert_eq!(
            machine.transition(ShellEvent::ToggleExport).unwrap(),
            ShellState::Live
        );
        assert!(!machine.state().export_modal_visible());
    }

    #[test]
    fn transition_records_history_with_ordered_entries() {
        let mut machine = StateMachine::new();
        for event in [
            ShellEvent::OpenExport,
            ShellEvent::ConfirmExport,
            ShellEvent::FinishExport,
            ShellEvent::CancelExport,
        ] {
            let _ = machine
                .transition(event)
                .expect("export round trip should be valid");
        }

        assert_eq!(machine.state(), ShellState::Live);
        assert_eq!(
            machine.history(),
            &[
                StateTransition::new(
                    ShellState::Live,
                    ShellEvent::OpenExport,
                    ShellState::Configuring
                ),
                StateTransition::new(
                    ShellState::Configuring,
                    ShellEvent::ConfirmExport,
                    ShellState::Exporting
                ),
                StateTransition::new(
                    ShellState::Exporting,
                    ShellEvent::FinishExport,
                    ShellState::Configuring
                ),
                StateTransition::new(
                    ShellState::Configuring,
                    ShellEvent::CancelExport,
                    ShellState::Live
                ),
            ]
        );
    }

    #[test]
    fn confirming_twice_is_rejected_while_exporting() {
        let mut machine = StateMachine::new();
        let _ = machine.transition(ShellEvent::OpenExport).unwrap();
        let _ = machine.transition(ShellEvent::ConfirmExport).unwrap();

        let err = machine
            .transition(ShellEvent::ConfirmExport)
            .expect_err("exporting -> confirm should fail");
        assert!(matches!(
            err,
            StateError::InvalidStateTransition {
                from: ShellState::Exporting,
                event: ShellEvent::ConfirmExport
            }
        ));
        assert_eq!(machine.state(), ShellState::Exporting);
        assert_eq!(machine.history().len(), 2);
    }

    #[test]
    fn invalid_transition_returns_error_without_mutating_history() {
        let mut machine = StateMachine::new();

        let err = machine
            .transition(ShellEvent::CancelExport)
            .expect_err("live -> cancel should fail");
        assert!(matches!(
            err,
            StateError::InvalidStateTransition {
                from: ShellState::Live,
                event: ShellEvent::CancelExport
            }
        ));
        assert_eq!(machine.state(), ShellState::Live);
        assert!(machine.history().is_empty());
    }
}
