use std::time::{Duration, Instant};

use crate::color::Color;

/// A trigger press this close to a backdrop dismiss belongs to the same click.
pub const TRIGGER_DISMISS_WINDOW: Duration = Duration::from_millis(150);

/// Corner of the gradient; the discriminant is the index into the corner array.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Corner {
    TopLeft = 0,
    TopRight = 1,
    BottomLeft = 2,
    BottomRight = 3,
}

impl Corner {
    pub const ALL: [Corner; 4] = [
        Corner::TopLeft,
        Corner::TopRight,
        Corner::BottomLeft,
        Corner::BottomRight,
    ];

    pub const fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Opposite corner, where the selection panel opens so it never covers its trigger.
    pub const fn diagonal(self) -> Corner {
        match self {
            Corner::TopLeft => Corner::BottomRight,
            Corner::TopRight => Corner::BottomLeft,
            Corner::BottomLeft => Corner::TopRight,
            Corner::BottomRight => Corner::TopLeft,
        }
    }

    pub const fn is_top(self) -> bool {
        matches!(self, Corner::TopLeft | Corner::TopRight)
    }

    pub const fn is_left(self) -> bool {
        matches!(self, Corner::TopLeft | Corner::BottomLeft)
    }

    pub const fn label(self) -> &'static str {
        match self {
            Corner::TopLeft => "top-left",
            Corner::TopRight => "top-right",
            Corner::BottomLeft => "bottom-left",
            Corner::BottomRight => "bottom-right",
        }
    }
}

/// Visibility state of one corner's color panel. Holds no color itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CornerPicker {
    corner: Corner,
    visible: bool,
    dismissed_at: Option<Instant>,
}

impl CornerPicker {
    pub const fn new(corner: Corner) -> Self {
        Self {
            corner,
            visible: false,
            dismissed_at: None,
        }
    }

    pub const fn corner(&self) -> Corner {
        self.corner
    }

    pub const fn is_visible(&self) -> bool {
        self.visible
    }

    pub const fn panel_corner(&self) -> Corner {
        self.corner.diagonal()
    }

    /// True when the panel opens above its trigger, toward the top row.
    pub const fn opens_upward(&self) -> bool {
        self.panel_corner().is_top()
    }

    pub fn toggle(&mut self) -> bool {
        self.visible = !self.visible;
        tracing::debug!(corner = self.corner.label(), visible = self.visible, "toggle picker");
        self.visible
    }

    /// Backdrop click.
    pub fn dismiss(&mut self) {
        if self.visible {
            tracing::debug!(corner = self.corner.label(), "dismiss picker");
        }
        self.visible = false;
    }

    /// Backdrop dismiss stamped with the time it happened.
    pub fn dismiss_at(&mut self, at: Instant) {
        if self.visible {
            self.dismissed_at = Some(at);
        }
        self.dismiss();
    }

    /// Trigger pressed at `pressed_at`. A press that itself dismissed the open
    /// panel through the backdrop leaves it closed instead of reopening it.
    pub fn trigger_at(&mut self, pressed_at: Instant) -> bool {
        let closed_by_press = self.dismissed_at.take().is_some_and(|dismissed_at| {
            let gap = if dismissed_at > pressed_at {
                dismissed_at - pressed_at
            } else {
                pressed_at - dismissed_at
            };
            gap <= TRIGGER_DISMISS_WINDOW
        });
        if closed_by_press {
            tracing::debug!(corner = self.corner.label(), "trigger press closed picker");
            self.visible = false;
            return false;
        }
        self.toggle()
    }

    /// Hands a finalized selection to the owner of the colors.
    pub fn complete<F>(&self, selection: Color, on_complete: F)
    where
        F: FnOnce(Corner, Color),
    {
        tracing::debug!(
            corner = self.corner.label(),
            color = %selection,
            alpha = selection.a,
            "picker selection complete"
        );
        on_complete(self.corner, selection);
    }
}

pub fn corner_pickers() -> [CornerPicker; 4] {
    Corner::ALL.map(CornerPicker::new)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn corner_indices_follow_row_major_order() {
        for (index, corner) in Corner::ALL.iter().enumerate() {
            assert_eq!(corner.index(), index);
            assert_eq!(Corner::from_index(index), Some(*corner));
        }
        assert_eq!(Corner::from_index(4), None);
    }

    #[test]
    fn diagonal_is_an_involution_across_both_axes() {
        for corner in Corner::ALL {
            let opposite = corner.diagonal();
            assert_ne!(corner.is_top(), opposite.is_top());
            assert_ne!(corner.is_left(), opposite.is_left());
            assert_eq!(opposite.diagonal(), corner);
        }
    }

    #[test]
    fn picker_starts_hidden_and_toggles() {
        let mut picker = CornerPicker::new(Corner::TopRight);
        assert!(!picker.is_visible());
        assert!(picker.toggle());
        assert!(!picker.toggle());
        assert_eq!(picker.panel_corner(), Corner::BottomLeft);
    }

    #[test]
    fn backdrop_dismiss_hides_the_panel() {
        let mut picker = CornerPicker::new(Corner::BottomLeft);
        picker.toggle();
        picker.dismiss();
        assert!(!picker.is_visible());
        picker.dismiss();
        assert!(!picker.is_visible());
    }

    #[test]
    fn complete_reports_corner_and_selection_without_closing() {
        let mut picker = CornerPicker::new(Corner::BottomRight);
        picker.toggle();
        let mut received = None;
        picker.complete(Color::new(1, 2, 3, 128), |corner, color| {
            received = Some((corner, color));
        });
        assert_eq!(
            received,
            Some((Corner::BottomRight, Color::new(1, 2, 3, 128)))
        );
        assert!(picker.is_visible());
    }

    #[test]
    fn corner_pickers_cover_each_corner_once() {
        let pickers = corner_pickers();
        let corners: Vec<_> = pickers.iter().map(CornerPicker::corner).collect();
        assert_eq!(corners, Corner::ALL.to_vec());
    }

    #[test]
    fn panels_open_toward_the_diagonal_row() {
        for corner in Corner::ALL {
            let picker = CornerPicker::new(corner);
            assert_eq!(picker.opens_upward(), !corner.is_top());
        }
    }

    #[test]
    fn trigger_press_that_dismissed_the_panel_keeps_it_closed() {
        let mut picker = CornerPicker::new(Corner::TopLeft);
        let start = Instant::now();
        assert!(picker.trigger_at(start));

        let press = start + Duration::from_secs(1);
        // backdrop handling may run before or after the trigger sees the press
        picker.dismiss_at(press + Duration::from_millis(5));
        assert!(!picker.trigger_at(press));
        assert!(!picker.is_visible());

        picker.toggle();
        picker.dismiss_at(press);
        assert!(!picker.trigger_at(press + Duration::from_millis(20)));

        let later = press + Duration::from_secs(2);
        assert!(picker.trigger_at(later));
        assert!(picker.is_visible());
    }

    #[test]
    fn trigger_after_an_unrelated_dismiss_reopens() {
        let mut picker = CornerPicker::new(Corner::BottomLeft);
        let start = Instant::now();
        assert!(picker.trigger_at(start));
        picker.dismiss_at(start + Duration::from_millis(100));
        assert!(picker.trigger_at(start + Duration::from_secs(3)));
    }
}
