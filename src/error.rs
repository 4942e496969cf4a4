//! Error types shared by the sampling pipeline.
//!
//! Every variant is fatal for a run: the sampling loop propagates the first
//! error it sees and the binary exits with a diagnostic.

use std::io;
use std::path::PathBuf;

/// Failure modes of a monitoring run.
#[derive(Debug, thiserror::Error)]
pub enum MonitorError {
    /// Accounting data for the target process could not be read or parsed.
    #[error("process {pid} unavailable: {reason}")]
    ProcessUnavailable { pid: String, reason: String },

    /// An external program (renderer or viewer) failed to start or exited non-zero.
    #[error("FAILED: {command} ({status})")]
    ExternalToolFailure { command: String, status: String },

    /// Reading or writing one of the run's files failed.
    #[error("{context} {}: {source}", .path.display())]
    Io {
        context: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl MonitorError {
    pub(crate) fn io(context: &'static str, path: impl Into<PathBuf>, source: io::Error) -> Self {
        MonitorError::Io {
            context,
            path: path.into(),
            source,
        }
    }

    pub(crate) fn unavailable(pid: &str, reason: impl Into<String>) -> Self {
        MonitorError::ProcessUnavailable {
            pid: pid.to_string(),
            reason: reason.into(),
        }
    }
}
