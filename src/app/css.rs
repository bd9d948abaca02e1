use gtk4::CssProvider;

use crate::ui::{ColorTokens, StyleTokens};

pub(super) fn install_runtime_css(tokens: StyleTokens, colors: &ColorTokens) {
    let css = format!(
        "
window.cornerglow-root {{
  background: #000000;
  color: {text_color};
}}
.cornerglow-root label,
.cornerglow-root button {{
  color: {text_color};
}}
.floating-panel {{
  border-radius: {control_radius}px;
  border: {border_width}px solid {border_color};
  background: {panel_background};
  padding: {spacing_4}px;
  box-shadow: 0 4px 16px rgba(0, 0, 0, 0.24),
              0 1px 3px rgba(0, 0, 0, 0.12);
}}
.icon-button {{
  border-radius: {control_radius}px;
  min-width: {control_size}px;
  min-height: {control_size}px;
  padding: 0;
  background: transparent;
  box-shadow: none;
  transition: box-shadow {motion_hover_ms}ms cubic-bezier(0.4, 0, 0.2, 1);
}}
.icon-button:hover {{
  box-shadow: 0 0 0 1.5px {focus_ring_glow};
}}
.icon-button:disabled {{
  opacity: 0.38;
}}
button.corner-button {{
  margin: {spacing_12}px;
}}
popover.corner-popover > contents {{
  border-radius: {panel_radius}px;
  padding: {spacing_8}px;
}}
button.primary-button {{
  background-image: {accent_gradient};
  color: {accent_text_color};
  border-color: transparent;
  font-weight: 600;
}}
.export-status {{
  font-size: 12px;
  opacity: 0.8;
}}
.toast-badge {{
  border-radius: {control_radius}px;
  border: {border_width}px solid {border_color};
  background: {panel_background};
  color: {text_color};
  padding: {spacing_8}px {spacing_16}px;
  font-size: 13px;
  font-weight: 500;
}}
",
        control_radius = tokens.control_radius,
        panel_radius = tokens.panel_radius,
        border_width = tokens.border_width,
        control_size = tokens.control_size,
        spacing_4 = tokens.spacing_4,
        spacing_8 = tokens.spacing_8,
        spacing_12 = tokens.spacing_12,
        spacing_16 = tokens.spacing_16,
        motion_hover_ms = tokens.motion_hover_ms,
        border_color = colors.border_color,
        panel_background = colors.panel_background,
        text_color = colors.text_color,
        focus_ring_glow = colors.focus_ring_glow,
        accent_gradient = colors.accent_gradient,
        accent_text_color = colors.accent_text_color,
    );

    let provider = CssProvider::new();
    provider.load_from_data(&css);
    if let Some(display) = gtk4::gdk::Display::default() {
        gtk4::style_context_add_provider_for_display(
            &display,
            &provider,
            gtk4::STYLE_PROVIDER_PRIORITY_APPLICATION,
        );
    }
}
