use gtk4::prelude::*;
use gtk4::{Align, Button};

use crate::picker::Corner;

pub fn icon_button(
    icon_name: &str,
    tooltip: &str,
    control_size: i32,
    extra_classes: &[&str],
) -> Button {
    let button = Button::from_icon_name(icon_name);
    button.set_focus_on_click(false);
    button.set_tooltip_text(Some(tooltip));
    button.add_css_class("flat");
    button.add_css_class("icon-button");
    for css_class in extra_classes {
        button.add_css_class(css_class);
    }
    button.set_size_request(control_size, control_size);
    button
}

/// Horizontal and vertical alignment pinning an overlay child to `corner`.
pub fn corner_align(corner: Corner) -> (Align, Align) {
    let halign = if corner.is_left() {
        Align::Start
    } else {
        Align::End
    };
    let valign = if corner.is_top() {
        Align::Start
    } else {
        Align::End
    };
    (halign, valign)
}
