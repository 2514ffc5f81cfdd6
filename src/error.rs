//! Error types and exit codes for repowatcher

use std::path::PathBuf;
use std::process::ExitCode;
use thiserror::Error;

/// Main error type for repowatcher operations
#[derive(Error, Debug)]
pub enum WatchError {
    #[error("Config error in {path}: {message}")]
    Config { path: PathBuf, message: String },

    #[error("Invalid poll interval in {path}: must be a positive number of seconds")]
    InvalidInterval { path: PathBuf },

    #[error("Duplicate repository name in {path}: {name}")]
    DuplicateRepository { path: PathBuf, name: String },

    #[error("Status command failed: {message}")]
    Oracle { message: String },

    #[error("Serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Unknown repository: {name}")]
    UnknownRepository { name: String },

    #[error("Tool not found on PATH: {tool}")]
    ToolNotFound { tool: String },

    #[error("Config watcher error: {message}")]
    Watch { message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl WatchError {
    /// True for the errors a config load can produce.
    ///
    /// These are fatal at startup and only logged on reload.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            Self::Config { .. } | Self::InvalidInterval { .. } | Self::DuplicateRepository { .. }
        )
    }

    /// Convert error to process exit code:
    /// - 0: Success
    /// - 1: Config / IO error
    /// - 2: Unknown repository or missing tool
    /// - 3: Status command failure
    /// - 4: Serialization defect
    pub fn exit_code(&self) -> ExitCode {
        match self {
            Self::Config { .. } => ExitCode::from(1),
            Self::InvalidInterval { .. } => ExitCode::from(1),
            Self::DuplicateRepository { .. } => ExitCode::from(1),
            Self::Watch { .. } => ExitCode::from(1),
            Self::Io(_) => ExitCode::from(1),
            Self::UnknownRepository { .. } => ExitCode::from(2),
            Self::ToolNotFound { .. } => ExitCode::from(2),
            Self::Oracle { .. } => ExitCode::from(3),
            Self::Serialization(_) => ExitCode::from(4),
        }
    }
}

/// Result type alias for repowatcher operations
pub type Result<T> = std::result::Result<T, WatchError>;
