//! GTK front end. Every widget reads from and writes to one shared
//! `GradientShell`; widgets only queue redraws.

mod corners;
mod css;
mod export_dialog;
mod render;
mod screen;
mod toast;

use std::cell::RefCell;
use std::rc::Rc;

use gtk4::prelude::*;
use gtk4::{
    Align, Application, ApplicationWindow, Box as GtkBox, DrawingArea, Label, Orientation,
    Overlay,
};
use rand::rngs::StdRng;

use crate::color::{random_corner_colors, RandomColor};
use crate::config::AppConfig;
use crate::picker::Corner;
use crate::shell::GradientShell;
use crate::storage::ExportStorage;
use crate::ui::{icon_button, StyleTokens, LAYOUT_TOKENS, PANEL_COLORS};

use export_dialog::ExportDialog;
use toast::ToastRuntime;

const APP_ID: &str = "io.github.cornerglow.CornerGlow";
const WINDOW_TITLE: &str = "CornerGlow";

#[derive(Clone)]
pub(super) struct GuiRuntime {
    shell: Rc<RefCell<GradientShell>>,
    canvas: DrawingArea,
    swatches: Rc<RefCell<Vec<DrawingArea>>>,
    toast: ToastRuntime,
    random_source: RandomColor,
    rng: Rc<RefCell<StdRng>>,
    storage: Rc<Option<ExportStorage>>,
    style_tokens: StyleTokens,
}

impl GuiRuntime {
    /// Queues a repaint of the gradient and of every corner swatch.
    fn queue_redraw(&self) {
        self.canvas.queue_draw();
        for swatch in self.swatches.borrow().iter() {
            swatch.queue_draw();
        }
    }

    fn randomize(&self) {
        self.shell
            .borrow_mut()
            .randomize(&self.random_source, &mut *self.rng.borrow_mut());
        self.queue_redraw();
    }
}

/// Runs the GTK application and returns its exit status.
pub(crate) fn run(config: AppConfig) -> gtk4::glib::ExitCode {
    let application = Application::new(Some(APP_ID), gtk4::gio::ApplicationFlags::NON_UNIQUE);
    let config = Rc::new(config);
    application.connect_activate(move |app| build_main_window(app, &config));

    // Only argv[0] goes to GTK; the real arguments were already parsed by clap.
    let gtk_args: Vec<String> = std::env::args().take(1).collect();
    application.run_with_args(&gtk_args)
}

fn build_shell(config: &AppConfig, random_source: &RandomColor, rng: &mut StdRng) -> GradientShell {
    let colors = random_corner_colors(random_source, rng);
    let mut shell =
        GradientShell::new(colors, config.export.settings()).with_span(config.export.span);
    if let Some(width) = config.export.width {
        shell.set_export_width(i64::from(width));
    }
    if let Some(height) = config.export.height {
        shell.set_export_height(i64::from(height));
    }
    tracing::info!(
        colors = ?(*shell.colors()).map(|color| color.to_hex()),
        size_mode = ?shell.size_mode(),
        "initialized gradient shell"
    );
    shell
}

fn build_main_window(app: &Application, config: &AppConfig) {
    let style_tokens = LAYOUT_TOKENS;
    css::install_runtime_css(style_tokens, &PANEL_COLORS);

    let random_source = config.random.source();
    let mut rng = config.random.rng();
    let shell = build_shell(config, &random_source, &mut rng);
    let storage = ExportStorage::from_output_dir(config.output_dir.as_deref())
        .inspect_err(|err| tracing::warn!(%err, "saving exports is unavailable"))
        .ok();

    let window = ApplicationWindow::new(app);
    window.set_title(Some(WINDOW_TITLE));
    window.add_css_class("cornerglow-root");
    window.set_default_size(
        style_tokens.window_default_width,
        style_tokens.window_default_height,
    );
    window.set_size_request(style_tokens.window_min_width, style_tokens.window_min_height);

    let canvas = DrawingArea::new();
    canvas.set_hexpand(true);
    canvas.set_vexpand(true);
    let overlay = Overlay::new();
    overlay.set_child(Some(&canvas));

    let toast_anchor = GtkBox::new(Orientation::Vertical, 0);
    toast_anchor.set_halign(Align::Center);
    toast_anchor.set_valign(Align::End);
    toast_anchor.set_margin_bottom(style_tokens.spacing_16);
    let toast_label = Label::new(Some(""));
    toast_label.add_css_class("toast-badge");
    toast_label.set_visible(false);
    toast_anchor.append(&toast_label);

    let runtime = GuiRuntime {
        shell: Rc::new(RefCell::new(shell)),
        canvas: canvas.clone(),
        swatches: Rc::new(RefCell::new(Vec::with_capacity(Corner::ALL.len()))),
        toast: ToastRuntime::new(&toast_label, style_tokens.toast_duration_ms),
        random_source,
        rng: Rc::new(RefCell::new(rng)),
        storage: Rc::new(storage),
        style_tokens,
    };

    {
        let shell = runtime.shell.clone();
        canvas.set_draw_func(move |_, context, _, _| {
            let shell = shell.borrow();
            let Some(image) = render::surface_to_cairo(shell.surface()) else {
                return;
            };
            if context.set_source_surface(&image, 0.0, 0.0).is_ok() {
                let _ = context.paint();
            }
        });
    }
    {
        let shell = runtime.shell.clone();
        canvas.connect_resize(move |area, width, height| {
            let resized = shell.borrow_mut().handle_resize(
                u32::try_from(width).unwrap_or(0),
                u32::try_from(height).unwrap_or(0),
            );
            if let Err(err) = resized {
                tracing::warn!(%err, width, height, "canvas resize rejected");
            }
            area.queue_draw();
        });
    }

    for corner in Corner::ALL {
        overlay.add_overlay(&corners::build_corner_control(&runtime, corner));
    }

    let export_dialog = ExportDialog::new(&window, &runtime);

    let toolbar = GtkBox::new(Orientation::Horizontal, style_tokens.spacing_4);
    toolbar.add_css_class("floating-panel");
    toolbar.set_halign(Align::Center);
    toolbar.set_valign(Align::Start);
    toolbar.set_margin_top(style_tokens.spacing_12);

    let randomize_button = icon_button(
        "view-refresh-symbolic",
        "Randomize colors",
        style_tokens.control_size,
        &[],
    );
    {
        let runtime = runtime.clone();
        randomize_button.connect_clicked(move |_| runtime.randomize());
    }
    let download_button = icon_button(
        "document-save-symbolic",
        "Export wallpaper",
        style_tokens.control_size,
        &[],
    );
    {
        let export_dialog = export_dialog.clone();
        download_button.connect_clicked(move |_| export_dialog.toggle());
    }
    toolbar.append(&randomize_button);
    toolbar.append(&download_button);

    overlay.add_overlay(&toolbar);
    overlay.add_overlay(&toast_anchor);
    window.set_child(Some(&overlay));

    tracing::info!("presenting gradient window");
    window.present();
}
