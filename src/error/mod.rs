use crate::config::ConfigError;
use crate::screen::ScreenSizeError;
use crate::state::StateError;
use crate::storage::StorageError;
use crate::surface::SurfaceError;
use thiserror::Error;

pub type AppResult<T> = std::result::Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    State(#[from] StateError),
    #[error(transparent)]
    Surface(#[from] SurfaceError),
    #[error("screen size unavailable: {0}")]
    Screen(#[from] ScreenSizeError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[cfg(feature = "gui")]
    #[error("gtk application exited unsuccessfully")]
    Gui,
}
