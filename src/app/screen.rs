use gtk4::prelude::*;
use gtk4::{gdk, Widget};

use crate::screen::{screen_size_from_geometry, ScreenSize, ScreenSizeError, ScreenSizeQuery};

/// Logical resolution of the monitor showing `widget`, or of the first
/// monitor when the widget is not mapped yet.
pub(super) struct MonitorScreen {
    widget: Widget,
}

impl MonitorScreen {
    pub(super) fn for_widget(widget: &impl IsA<Widget>) -> Self {
        Self {
            widget: widget.clone().upcast(),
        }
    }

    fn monitor(&self, display: &gdk::Display) -> Option<gdk::Monitor> {
        self.widget
            .native()
            .and_then(|native| native.surface())
            .and_then(|surface| display.monitor_at_surface(&surface))
            .or_else(|| {
                display
                    .monitors()
                    .item(0)
                    .and_then(|item| item.downcast::<gdk::Monitor>().ok())
            })
    }
}

impl ScreenSizeQuery for MonitorScreen {
    fn screen_size(&self) -> Result<ScreenSize, ScreenSizeError> {
        let display = gdk::Display::default().ok_or(ScreenSizeError::NoDisplay)?;
        let monitor = self.monitor(&display).ok_or(ScreenSizeError::NoMonitor)?;
        let geometry = monitor.geometry();
        screen_size_from_geometry(geometry.width(), geometry.height())
    }
}
