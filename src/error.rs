//! Error types for trk
//!
//! Exit codes:
//! - 0: Success
//! - 2: User error (bad args, unknown id)
//! - 3: Schedule conflict (time box overlaps an existing item)
//! - 4: Operation failed (I/O, serialization)

use std::path::PathBuf;
use thiserror::Error;

/// Exit codes for the trk CLI
pub mod exit_codes {
    pub const SUCCESS: i32 = 0;
    pub const USER_ERROR: i32 = 2;
    pub const SCHEDULE_CONFLICT: i32 = 3;
    pub const OPERATION_FAILED: i32 = 4;
}

/// Main error type for trk operations
#[derive(Error, Debug)]
pub enum Error {
    // User errors (exit code 2)
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("No work item with id {0}")]
    NotFound(u32),

    #[error("No epic with id {0}")]
    EpicNotFound(u32),

    // Schedule conflicts (exit code 3)
    #[error("Time box overlaps item {id}")]
    ScheduleConflict {
        /// Id of the already-admitted item the candidate collides with.
        id: u32,
    },

    // Operation failures (exit code 4)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("Failed to persist {0}")]
    PersistFailed(PathBuf),
}

impl Error {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::InvalidArgument(_) | Error::NotFound(_) | Error::EpicNotFound(_) => {
                exit_codes::USER_ERROR
            }

            Error::ScheduleConflict { .. } => exit_codes::SCHEDULE_CONFLICT,

            Error::Io(_) | Error::Json(_) | Error::TomlParse(_) | Error::PersistFailed(_) => {
                exit_codes::OPERATION_FAILED
            }
        }
    }
}

/// Result type alias for trk operations
pub type Result<T> = std::result::Result<T, Error>;
