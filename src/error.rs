//! Error types for the consolidator.
//!
//! Two layers: [`FileParseError`] is recovered per input file (the file is
//! skipped and the scan goes on), [`ConsolidateError`] ends the run.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Why a single input file was skipped.
#[derive(Error, Debug)]
pub enum FileParseError {
    #[error("{0}")]
    Read(#[from] io::Error),

    #[error("{0}")]
    Json(#[from] serde_json::Error),

    /// Top-level value is a primitive, so there is nowhere to put `_source`.
    #[error("top-level JSON {kind} is neither an object nor an array")]
    NotAnnotatable { kind: &'static str },
}

/// Conditions that stop a run.
#[derive(Error, Debug)]
pub enum ConsolidateError {
    #[error("Directory {} not found", .path.display())]
    DirectoryNotFound { path: PathBuf },

    #[error("No leads found")]
    NoRecordsFound,

    #[error("Failed to list {}: {source}", .path.display())]
    ListDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The console (or whatever the reporter writes to) went away.
    #[error("Failed to print progress: {0}")]
    Report(#[from] io::Error),
}

impl ConsolidateError {
    /// Anticipated early returns: reported to the user, not process failures.
    pub fn is_nothing_to_do(&self) -> bool {
        matches!(self, Self::DirectoryNotFound { .. } | Self::NoRecordsFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nothing_to_do_covers_only_the_two_early_returns() {
        let missing = ConsolidateError::DirectoryNotFound { path: PathBuf::from("data") };
        assert!(missing.is_nothing_to_do());
        assert!(ConsolidateError::NoRecordsFound.is_nothing_to_do());

        let write = ConsolidateError::Write {
            path: PathBuf::from("data/leads.json"),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        };
        assert!(!write.is_nothing_to_do());

        let report = ConsolidateError::from(io::Error::from(io::ErrorKind::BrokenPipe));
        assert!(!report.is_nothing_to_do());
    }

    #[test]
    fn messages() {
        let missing = ConsolidateError::DirectoryNotFound { path: PathBuf::from("/tmp/data") };
        assert_eq!(missing.to_string(), "Directory /tmp/data not found");
        assert_eq!(ConsolidateError::NoRecordsFound.to_string(), "No leads found");

        let err = FileParseError::NotAnnotatable { kind: "number" };
        assert_eq!(err.to_string(), "top-level JSON number is neither an object nor an array");
    }
}
