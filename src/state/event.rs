use super::model::ShellState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShellEvent {
    OpenExport,
    ToggleExport,
    ConfirmExport,
    FinishExport,
    CancelExport,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateTransition {
    pub from: ShellState,
    pub event: ShellEvent,
    pub to: ShellState,
}

impl StateTransition {
    pub const fn new(from: ShellState, event: ShellEvent, to: ShellState) -> Self {
        Self { from, event, to }
    }
}
