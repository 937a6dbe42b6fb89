//! Demo scenes for the scene engine
//!
//! Each binary builds one of the scenes in [`scenes`], then renders it with
//! the [`headless::LogRenderer`], which reports frame contents through `log`
//! instead of drawing.

pub mod headless;
pub mod input;
pub mod scenes;

use std::path::PathBuf;

use scene_engine::animation::LoopError;
use scene_engine::config::{Config, ConfigError, EngineSettings};
use scene_engine::render::RenderError;
use scene_engine::SceneError;
use thiserror::Error;

/// Errors surfaced by the demo binaries
#[derive(Error, Debug)]
pub enum DemoError {
    /// Settings file could not be loaded
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Scene construction or parameter access failed
    #[error("Scene error: {0}")]
    Scene(#[from] SceneError),

    /// The animation loop stopped with an error
    #[error("Loop error: {0}")]
    Loop(#[from] LoopError),

    /// A single-frame render failed
    #[error("Render error: {0}")]
    Render(#[from] RenderError),
}

/// Load settings from the first command-line argument, if any, and start logging
pub fn bootstrap(demo: &str) -> Result<EngineSettings, DemoError> {
    let path = std::env::args_os().nth(1).map(PathBuf::from);
    let settings = EngineSettings::load_or_default(path.as_deref())?;
    scene_engine::foundation::logging::init(&settings.log_filter);
    log::info!("Starting {demo} demo");
    if let Some(path) = path {
        log::info!("Using settings from {}", path.display());
    }
    Ok(settings)
}

/// Log the outcome of a demo run and pass it through
pub fn finish(demo: &str, result: Result<(), DemoError>) -> Result<(), DemoError> {
    match &result {
        Ok(()) => log::info!("{demo} demo completed successfully"),
        Err(e) => log::error!("{demo} demo failed: {e}"),
    }
    result
}
