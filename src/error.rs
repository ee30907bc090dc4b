//! Centralized error handling for ctlcenter

use std::io;
use std::time::Duration;
use thiserror::Error;

/// Custom error type for ctlcenter operations
#[derive(Debug, Error)]
pub enum ControlCenterError {
    /// I/O errors (config files, pipes)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    /// The shell could not be started for a command
    #[error("failed to spawn '{cmd}': {source}")]
    Spawn {
        cmd: String,
        #[source]
        source: io::Error,
    },
    /// The command ran but exited non-zero (or was killed by a signal)
    #[error("command '{cmd}' failed with exit code: {code:?}")]
    Exit { cmd: String, code: Option<i32> },
    /// The command was still running when its time budget ran out
    #[error("command '{cmd}' timed out after {after:?}")]
    Timeout { cmd: String, after: Duration },
    /// Output did not match the expected grammar
    #[error("parse error: {0}")]
    Parse(String),
    /// Direct mixer binding errors
    #[error("mixer error: {0}")]
    Mixer(String),
    /// Configuration errors
    #[error("config error: {0}")]
    Config(String),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ControlCenterError {
    /// True for failures of an external command (spawn, exit status, timeout).
    pub fn is_exec(&self) -> bool {
        matches!(
            self,
            ControlCenterError::Spawn { .. }
                | ControlCenterError::Exit { .. }
                | ControlCenterError::Timeout { .. }
        )
    }
}

/// Type alias for Results in ctlcenter
pub type Result<T> = std::result::Result<T, ControlCenterError>;
