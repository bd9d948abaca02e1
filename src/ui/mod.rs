pub mod style;
pub mod widgets;

pub use style::{ColorTokens, StyleTokens, LAYOUT_TOKENS, PANEL_COLORS};
pub use widgets::{corner_align, icon_button};
