/// Which part of the export flow the shell is in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ShellState {
    /// Only the live gradient is shown.
    #[default]
    Live,
    /// The export dialog is open and editable.
    Configuring,
    /// An export was confirmed and its artifact is pending.
    Exporting,
}

impl ShellState {
    pub const fn export_modal_visible(self) -> bool {
        matches!(self, ShellState::Configuring | ShellState::Exporting)
    }
}
