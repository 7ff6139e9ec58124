//! Errors surfaced by the runner binary.

use std::path::PathBuf;

use thiserror::Error;

use driftfield_core::error::ConfigError;
use driftfield_sim::persistence::PersistenceError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("save file {path}: {source}")]
    SaveFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("save data: {0}")]
    SaveData(#[from] PersistenceError),

    #[error("failed to start game loop thread: {0}")]
    Spawn(#[source] std::io::Error),

    #[error("game loop thread panicked")]
    LoopPanicked,
}
