use std::cell::Cell;
use std::rc::Rc;
use std::time::Instant;

use gtk4::prelude::*;
use gtk4::{
    gdk, Box as GtkBox, Button, ColorChooserWidget, DrawingArea, GestureClick, Orientation,
    Popover, PositionType, PropagationPhase,
};

use crate::color::Color;
use crate::picker::{Corner, CornerPicker};
use crate::ui::corner_align;

use super::GuiRuntime;

fn draw_swatch(context: &gtk4::cairo::Context, width: i32, height: i32, color: Color) {
    let radius = (f64::from(width.min(height)) / 2.0) - 1.2;
    let center_x = f64::from(width) / 2.0;
    let center_y = f64::from(height) / 2.0;
    context.save().ok();
    context.arc(
        center_x,
        center_y,
        radius.max(1.0),
        0.0,
        std::f64::consts::TAU,
    );
    context.set_source_rgb(
        f64::from(color.r) / 255.0,
        f64::from(color.g) / 255.0,
        f64::from(color.b) / 255.0,
    );
    let _ = context.fill_preserve();
    context.set_source_rgba(1.0, 1.0, 1.0, 0.55);
    context.set_line_width(1.5);
    let _ = context.stroke();
    context.restore().ok();
}

fn chooser_color(chooser: &ColorChooserWidget) -> Color {
    let rgba = chooser.rgba();
    Color::from_unit_rgba(rgba.red(), rgba.green(), rgba.blue(), rgba.alpha())
}

/// Button pinned to `corner` whose popover edits that corner's color.
pub(super) fn build_corner_control(runtime: &GuiRuntime, corner: Corner) -> Button {
    let tokens = runtime.style_tokens;
    let picker = Rc::new(Cell::new(CornerPicker::new(corner)));

    let swatch = DrawingArea::new();
    swatch.set_content_width(tokens.swatch_size);
    swatch.set_content_height(tokens.swatch_size);
    swatch.set_can_target(false);
    {
        let shell = runtime.shell.clone();
        swatch.set_draw_func(move |_, context, width, height| {
            draw_swatch(context, width, height, shell.borrow().color(corner));
        });
    }
    runtime.swatches.borrow_mut().push(swatch.clone());

    let button = Button::new();
    button.set_child(Some(&swatch));
    button.set_focus_on_click(false);
    button.set_tooltip_text(Some(&format!("Pick {} color", corner.label())));
    for css_class in ["flat", "icon-button", "floating-panel", "corner-button"] {
        button.add_css_class(css_class);
    }
    button.set_size_request(tokens.control_size, tokens.control_size);
    let (halign, valign) = corner_align(corner);
    button.set_halign(halign);
    button.set_valign(valign);

    let chooser = ColorChooserWidget::new();
    chooser.set_use_alpha(true);

    let apply_button = Button::with_label("Apply");
    apply_button.add_css_class("primary-button");

    let content = GtkBox::new(Orientation::Vertical, tokens.spacing_8);
    content.append(&chooser);
    content.append(&apply_button);

    // Vertical placement follows the row of the diagonal corner.
    let popover = Popover::new();
    popover.add_css_class("corner-popover");
    popover.set_autohide(true);
    popover.set_position(if picker.get().opens_upward() {
        PositionType::Top
    } else {
        PositionType::Bottom
    });
    popover.set_child(Some(&content));
    popover.set_parent(&button);
    {
        let popover = popover.clone();
        button.connect_destroy(move |_| popover.unparent());
    }

    let apply_selection = {
        let runtime = runtime.clone();
        let picker = picker.clone();
        move |selection: Color| {
            picker.get().complete(selection, |corner, color| {
                runtime.shell.borrow_mut().select_color(corner, color);
            });
            runtime.queue_redraw();
        }
    };

    {
        let chooser_for_apply = chooser.clone();
        let apply_selection = apply_selection.clone();
        apply_button.connect_clicked(move |_| apply_selection(chooser_color(&chooser_for_apply)));
    }
    chooser.connect_color_activated(move |_, rgba| {
        apply_selection(Color::from_unit_rgba(
            rgba.red(),
            rgba.green(),
            rgba.blue(),
            rgba.alpha(),
        ));
    });

    {
        let picker = picker.clone();
        popover.connect_closed(move |_| {
            let mut state = picker.get();
            state.dismiss_at(Instant::now());
            picker.set(state);
        });
    }

    let pressed_at = Rc::new(Cell::new(None::<Instant>));
    {
        let pressed_at = pressed_at.clone();
        let press = GestureClick::new();
        press.set_propagation_phase(PropagationPhase::Capture);
        press.connect_pressed(move |_, _, _, _| pressed_at.set(Some(Instant::now())));
        button.add_controller(press);
    }

    {
        let shell = runtime.shell.clone();
        let chooser = chooser.clone();
        let popover = popover.clone();
        button.connect_clicked(move |_| {
            let mut state = picker.get();
            let visible = state.trigger_at(pressed_at.take().unwrap_or_else(Instant::now));
            picker.set(state);
            if visible {
                let (red, green, blue, alpha) = shell.borrow().color(corner).to_unit_rgba();
                chooser.set_rgba(&gdk::RGBA::new(red, green, blue, alpha));
                popover.popup();
            } else {
                popover.popdown();
            }
        });
    }

    button
}
