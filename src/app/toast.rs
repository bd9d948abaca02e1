use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

use gtk4::prelude::*;
use gtk4::Label;

#[derive(Clone)]
pub(super) struct ToastRuntime {
    label: Label,
    duration_ms: u32,
    sequence: Rc<Cell<u64>>,
}

impl ToastRuntime {
    pub(super) fn new(label: &Label, duration_ms: u32) -> Self {
        Self {
            label: label.clone(),
            duration_ms,
            sequence: Rc::new(Cell::new(0)),
        }
    }

    /// Shows `message` until it expires or a newer toast replaces it.
    pub(super) fn show(&self, message: impl Into<String>) {
        let message = message.into();
        self.label.set_text(&message);
        self.label.set_visible(true);

        let sequence = self.sequence.get().saturating_add(1);
        self.sequence.set(sequence);

        let label = self.label.clone();
        let latest_sequence = self.sequence.clone();
        gtk4::glib::timeout_add_local_once(
            Duration::from_millis(u64::from(self.duration_ms)),
            move || {
                if latest_sequence.get() == sequence {
                    label.set_visible(false);
                }
            },
        );
    }
}
