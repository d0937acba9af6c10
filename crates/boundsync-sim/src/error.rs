//! Error handling for the boundsync-sim crate.

use std::{io, path::PathBuf, result};

use thiserror::Error;

/// Convenient result type for simulator operations.
pub type Result<T> = result::Result<T, Error>;

/// Errors that can occur while loading or replaying a scenario.
#[derive(Debug, Error)]
pub enum Error {
    /// Reading the scenario file failed.
    #[error("failed to read {path}: {source}")]
    Io {
        /// Scenario path.
        path: PathBuf,
        /// Underlying error.
        source: io::Error,
    },
    /// The scenario is not valid RON for the expected shape.
    #[error("failed to parse scenario: {0}")]
    Parse(#[from] ron::error::SpannedError),
    /// Errors surfaced by the tracking core.
    #[error("core error: {0}")]
    Core(#[from] boundsync::Error),
    /// A step names a window the scenario never declared.
    #[error("unknown window {0:?}")]
    UnknownWindow(String),
    /// Two windows share a name.
    #[error("duplicate window {0:?}")]
    DuplicateWindow(String),
    /// Encoding a notification failed.
    #[error("failed to encode notification: {0}")]
    Json(#[from] serde_json::Error),
}
