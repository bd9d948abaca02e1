use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenSize {
    pub width: u32,
    pub height: u32,
}

impl ScreenSize {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ScreenSizeError {
    #[error("no display is available")]
    NoDisplay,
    #[error("no monitor is attached to the display")]
    NoMonitor,
    #[error("monitor reported an empty size ({width}x{height})")]
    EmptyGeometry { width: i32, height: i32 },
}

/// Source of the physical screen resolution.
pub trait ScreenSizeQuery {
    fn screen_size(&self) -> Result<ScreenSize, ScreenSizeError>;
}

/// Fixed answer, used when the resolution is known up front.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedScreen(pub Result<ScreenSize, ScreenSizeError>);

impl FixedScreen {
    pub const fn available(width: u32, height: u32) -> Self {
        Self(Ok(ScreenSize::new(width, height)))
    }

    pub const fn unavailable() -> Self {
        Self(Err(ScreenSizeError::NoDisplay))
    }
}

impl ScreenSizeQuery for FixedScreen {
    fn screen_size(&self) -> Result<ScreenSize, ScreenSizeError> {
        self.0
    }
}

/// Validates a raw monitor geometry.
pub fn screen_size_from_geometry(width: i32, height: i32) -> Result<ScreenSize, ScreenSizeError> {
    match (u32::try_from(width), u32::try_from(height)) {
        (Ok(w), Ok(h)) if w > 0 && h > 0 => Ok(ScreenSize::new(w, h)),
        _ => Err(ScreenSizeError::EmptyGeometry { width, height }),
    }
}
