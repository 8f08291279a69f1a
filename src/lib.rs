pub mod app;
mod config;
pub mod encode;
pub mod error;
pub mod export;
pub mod generate;
pub mod logging;
pub mod notification;
pub mod options;
pub mod preview;
pub mod ui;
pub use error::{AppError, AppResult};

/// Entrypoint used by the binary shell and higher-level integrations.
pub fn run() -> AppResult<()> {
    logging::init();
    tracing::info!("starting QrSmith");

    let mut app = app::App::new();
    app.start()?;

    tracing::info!("shutdown complete");
    Ok(())
}
