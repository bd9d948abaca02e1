/// Compile-time layout tokens, not user-overridable
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StyleTokens {
    pub spacing_4: i32,
    pub spacing_8: i32,
    pub spacing_12: i32,
    pub spacing_16: i32,
    pub control_radius: u16,
    pub panel_radius: u16,
    pub control_size: i32,
    pub swatch_size: i32,
    pub border_width: u16,
    pub window_default_width: i32,
    pub window_default_height: i32,
    pub window_min_width: i32,
    pub window_min_height: i32,
    pub motion_hover_ms: u32,
    pub toast_duration_ms: u32,
}

pub const LAYOUT_TOKENS: StyleTokens = StyleTokens {
    spacing_4: 4,
    spacing_8: 8,
    spacing_12: 12,
    spacing_16: 16,
    control_radius: 12,
    panel_radius: 18,
    control_size: 40,
    swatch_size: 22,
    border_width: 1,
    window_default_width: 960,
    window_default_height: 600,
    window_min_width: 320,
    window_min_height: 200,
    motion_hover_ms: 160,
    toast_duration_ms: 2_500,
};

/// Colors of the floating controls drawn over the gradient.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorTokens {
    pub panel_background: &'static str,
    pub border_color: &'static str,
    pub text_color: &'static str,
    pub focus_ring_glow: &'static str,
    pub accent_gradient: &'static str,
    pub accent_text_color: &'static str,
}

pub const PANEL_COLORS: ColorTokens = ColorTokens {
    panel_background: "rgba(24, 24, 28, 0.82)",
    border_color: "rgba(255, 255, 255, 0.14)",
    text_color: "rgba(245, 245, 247, 0.96)",
    focus_ring_glow: "rgba(255, 255, 255, 0.32)",
    accent_gradient: "linear-gradient(135deg, #7f7fd5, #86a8e7 55%, #91eae4)",
    accent_text_color: "#101014",
};
