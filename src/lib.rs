#[cfg(feature = "gui")]
pub mod app;
pub mod color;
pub mod config;
pub mod error;
pub mod export;
pub mod gradient;
pub mod logging;
#[cfg(feature = "gui")]
pub mod notification;
pub mod picker;
pub mod screen;
pub mod shell;
pub mod state;
pub mod storage;
pub mod surface;
#[cfg(feature = "gui")]
pub mod ui;
pub use error::{AppError, AppResult};
pub use shell::{ExportOutcome, GradientShell};

/// Opens the gradient window and blocks until it closes.
#[cfg(feature = "gui")]
pub fn run(config: config::AppConfig) -> AppResult<()> {
    tracing::info!("starting CornerGlow");
    if app::run(config) != gtk4::glib::ExitCode::SUCCESS {
        return Err(AppError::Gui);
    }
    tracing::info!("window closed");
    Ok(())
}
