//! Error types for proxy checks and batch runs

use std::io;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Why a single candidate ended up dead.
///
/// The `Display` output is the line recorded in the error log, so a
/// confirmed-dead proxy and a failed request read the same way downstream.
#[derive(Error, Debug)]
pub enum CheckError {
    #[error("{target} is DEAD")]
    NotAlive { target: String },

    #[error("Error checking {target}: {source}")]
    Transport {
        target: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Error checking {target}: request timed out after {}s", .timeout.as_secs())]
    Timeout { target: String, timeout: Duration },

    #[error("Error checking {target}: HTTP status: {status}")]
    HttpStatus {
        target: String,
        status: reqwest::StatusCode,
    },

    #[error("Error parsing JSON for {target}: {reason}")]
    Parse { target: String, reason: String },
}

impl CheckError {
    pub fn parse(target: &str, reason: impl ToString) -> Self {
        Self::Parse {
            target: target.to_string(),
            reason: reason.to_string(),
        }
    }
}

/// Errors that stop or degrade a batch run
#[derive(Error, Debug)]
pub enum RunError {
    #[error("input file {} not found", .0.display())]
    InputNotFound(PathBuf),

    #[error("failed to read input file {}: {source}", .path.display())]
    InputUnreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to write {}: {source}", .path.display())]
    OutputWrite {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to serialize {}: {source}", .path.display())]
    Serialize {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl RunError {
    pub fn output_write(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::OutputWrite {
            path: path.into(),
            source,
        }
    }
}
