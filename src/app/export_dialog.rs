use std::cell::Cell;
use std::rc::Rc;

use gtk4::prelude::*;
use gtk4::{
    Align, ApplicationWindow, Box as GtkBox, Button, Dialog, Label, Orientation, ResponseType,
    SpinButton, Spinner,
};

use crate::export::{SizeMode, DEFAULT_FILE_STEM, EXPORT_FEEDBACK_DELAY, MAX_EXPORT_DIMENSION};
use crate::notification;
use crate::shell::{ExportOutcome, GradientShell};

use super::screen::MonitorScreen;
use super::GuiRuntime;

fn status_text(shell: &GradientShell) -> String {
    let (width, height) = shell.export_size();
    if shell.export_in_progress() {
        return format!("Generating {width} × {height}…");
    }
    if let Some(artifact) = shell.artifact() {
        return format!(
            "{} × {} {} ready",
            artifact.width,
            artifact.height,
            artifact.kind.to_string().to_uppercase()
        );
    }
    match shell.size_mode() {
        SizeMode::FollowDisplay => "Size follows the window".to_string(),
        SizeMode::FollowScreen => "Size matches the screen".to_string(),
        SizeMode::Explicit => format!("Custom size {width} × {height}"),
    }
}

fn dimension_spin(max: u32) -> SpinButton {
    let spin = SpinButton::with_range(1.0, f64::from(max), 1.0);
    spin.set_numeric(true);
    spin.set_digits(0);
    spin.set_hexpand(true);
    spin
}

#[derive(Clone)]
pub(super) struct ExportDialog {
    dialog: Dialog,
    runtime: GuiRuntime,
    width_spin: SpinButton,
    height_spin: SpinButton,
    spinner: Spinner,
    status_label: Label,
    generate_button: Button,
    save_button: Button,
    syncing: Rc<Cell<bool>>,
}

impl ExportDialog {
    pub(super) fn new(window: &ApplicationWindow, runtime: &GuiRuntime) -> Self {
        let tokens = runtime.style_tokens;

        let dialog = Dialog::new();
        dialog.add_css_class("cornerglow-root");
        dialog.set_title(Some("Export wallpaper"));
        dialog.set_transient_for(Some(window));
        dialog.set_modal(true);
        dialog.set_hide_on_close(true);
        dialog.set_destroy_with_parent(true);
        dialog.add_button("Close", ResponseType::Close);

        let width_spin = dimension_spin(MAX_EXPORT_DIMENSION);
        let height_spin = dimension_spin(MAX_EXPORT_DIMENSION);
        let size_row = GtkBox::new(Orientation::Horizontal, tokens.spacing_8);
        size_row.append(&Label::new(Some("Width")));
        size_row.append(&width_spin);
        size_row.append(&Label::new(Some("Height")));
        size_row.append(&height_spin);

        let follow_window_button = Button::with_label("Follow window");
        let follow_screen_button = Button::with_label("Follow screen");
        let preset_row = GtkBox::new(Orientation::Horizontal, tokens.spacing_8);
        preset_row.set_homogeneous(true);
        preset_row.append(&follow_window_button);
        preset_row.append(&follow_screen_button);

        let spinner = Spinner::new();
        let status_label = Label::new(None);
        status_label.add_css_class("export-status");
        status_label.set_hexpand(true);
        status_label.set_xalign(0.0);
        let generate_button = Button::with_label("Generate");
        generate_button.add_css_class("primary-button");
        let save_button = Button::with_label("Save");
        let action_row = GtkBox::new(Orientation::Horizontal, tokens.spacing_8);
        action_row.set_valign(Align::Center);
        action_row.append(&spinner);
        action_row.append(&status_label);
        action_row.append(&generate_button);
        action_row.append(&save_button);

        let dialog_content = GtkBox::new(Orientation::Vertical, tokens.spacing_12);
        dialog_content.set_margin_top(tokens.spacing_12);
        dialog_content.set_margin_bottom(tokens.spacing_12);
        dialog_content.set_margin_start(tokens.spacing_12);
        dialog_content.set_margin_end(tokens.spacing_12);
        dialog_content.append(&size_row);
        dialog_content.append(&preset_row);
        dialog_content.append(&action_row);
        dialog.content_area().append(&dialog_content);

        let export_dialog = Self {
            dialog,
            runtime: runtime.clone(),
            width_spin,
            height_spin,
            spinner,
            status_label,
            generate_button,
            save_button,
            syncing: Rc::new(Cell::new(false)),
        };
        export_dialog.connect_signals(&follow_window_button, &follow_screen_button);
        export_dialog
    }

    fn connect_signals(&self, follow_window_button: &Button, follow_screen_button: &Button) {
        {
            let this = self.clone();
            self.width_spin.connect_value_changed(move |spin| {
                if this.syncing.get() {
                    return;
                }
                this.runtime
                    .shell
                    .borrow_mut()
                    .set_export_width(i64::from(spin.value_as_int()));
                this.sync_from_shell();
            });
        }
        {
            let this = self.clone();
            self.height_spin.connect_value_changed(move |spin| {
                if this.syncing.get() {
                    return;
                }
                this.runtime
                    .shell
                    .borrow_mut()
                    .set_export_height(i64::from(spin.value_as_int()));
                this.sync_from_shell();
            });
        }
        {
            let this = self.clone();
            follow_window_button.connect_clicked(move |_| {
                this.runtime.shell.borrow_mut().follow_display_size();
                this.sync_from_shell();
            });
        }
        {
            let this = self.clone();
            follow_screen_button.connect_clicked(move |_| {
                let query = MonitorScreen::for_widget(&this.dialog);
                let result = this.runtime.shell.borrow_mut().follow_screen_size(&query);
                if let Err(err) = result {
                    this.runtime.toast.show(format!("Screen size unavailable: {err}"));
                }
                this.sync_from_shell();
            });
        }
        {
            let this = self.clone();
            self.generate_button.connect_clicked(move |_| this.generate());
        }
        {
            let this = self.clone();
            self.save_button.connect_clicked(move |_| this.save());
        }
        {
            let this = self.clone();
            self.dialog.connect_response(move |_, response| {
                if matches!(response, ResponseType::Close | ResponseType::DeleteEvent) {
                    this.close();
                }
            });
        }
    }

    /// Download button: opens the dialog, or closes it when already open.
    pub(super) fn toggle(&self) {
        let result = self.runtime.shell.borrow_mut().toggle_export_modal();
        match result {
            Ok(state) if state.export_modal_visible() => {
                self.sync_from_shell();
                self.dialog.present();
            }
            Ok(_) => self.dialog.set_visible(false),
            Err(err) => tracing::warn!(%err, "ignoring export dialog toggle"),
        }
    }

    fn close(&self) {
        if let Err(err) = self.runtime.shell.borrow_mut().cancel_export() {
            tracing::debug!(%err, "export dialog already closed");
        }
        self.spinner.stop();
        self.dialog.set_visible(false);
    }

    fn sync_from_shell(&self) {
        let shell = self.runtime.shell.borrow();
        let (width, height) = shell.export_size();

        self.syncing.set(true);
        self.width_spin.set_value(f64::from(width.max(1)));
        self.height_spin.set_value(f64::from(height.max(1)));
        self.syncing.set(false);

        self.status_label.set_text(&status_text(&shell));
        self.generate_button.set_sensitive(!shell.export_in_progress());
        self.save_button.set_sensitive(shell.artifact().is_some());
    }

    fn generate(&self) {
        let request = match self.runtime.shell.borrow_mut().begin_export() {
            Ok(request) => request,
            Err(err) => {
                tracing::warn!(%err, "export confirm rejected");
                return;
            }
        };
        self.spinner.start();
        self.sync_from_shell();

        let this = self.clone();
        gtk4::glib::timeout_add_local_once(EXPORT_FEEDBACK_DELAY, move || {
            let outcome = this.runtime.shell.borrow_mut().complete_export(request);
            this.spinner.stop();
            match outcome {
                Ok(ExportOutcome::Completed) => this.runtime.queue_redraw(),
                Ok(ExportOutcome::Discarded) => {}
                Err(err) => {
                    tracing::error!(%err, "export failed");
                    this.runtime.toast.show(format!("Export failed: {err}"));
                }
            }
            this.sync_from_shell();
        });
    }

    fn save(&self) {
        let Some(artifact) = self.runtime.shell.borrow().artifact().cloned() else {
            return;
        };
        let Some(storage) = &*self.runtime.storage else {
            self.runtime
                .toast
                .show("No output directory; set output_dir in config.json");
            return;
        };
        match storage.save_artifact(&artifact) {
            Ok(path) => {
                notification::export_saved(&path);
                self.runtime.toast.show(format!(
                    "Saved {}",
                    path.file_name()
                        .and_then(|name| name.to_str())
                        .unwrap_or(DEFAULT_FILE_STEM)
                ));
            }
            Err(err) => {
                tracing::error!(%err, "failed to save export");
                self.runtime.toast.show(format!("Save failed: {err}"));
            }
        }
    }
}
