//! Error types for the masscrc core library.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for the library
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the masscrc core library
///
/// Per-path I/O failures are recoverable: workers report and count them and
/// keep draining the queue. `WorkerStopped` is the sentinel a handler returns
/// when a worker's consumption loop should end early; it never reaches users.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O related errors
    #[error(transparent)]
    Io(#[from] IoError),

    /// Invalid pipeline or CLI configuration
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Sentinel requesting that a worker stop consuming further paths
    #[error("worker consumption stopped")]
    WorkerStopped,
}

/// I/O error with additional context
#[derive(Error, Debug)]
#[error("{}", format_io_error(self))]
pub struct IoError {
    /// The kind of I/O error
    pub kind: IoErrorKind,
    /// Path associated with the error (if any)
    pub path: Option<PathBuf>,
    /// Underlying I/O error (if any)
    #[source]
    pub source: Option<std::io::Error>,
}

/// Kind of I/O error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IoErrorKind {
    /// File not found
    FileNotFound,
    /// Permission denied
    PermissionDenied,
    /// Generic I/O error
    Other,
}

impl IoError {
    /// Create an I/O error from a standard I/O error
    pub fn from_std(source: std::io::Error) -> Self {
        let kind = match source.kind() {
            std::io::ErrorKind::NotFound => IoErrorKind::FileNotFound,
            std::io::ErrorKind::PermissionDenied => IoErrorKind::PermissionDenied,
            _ => IoErrorKind::Other,
        };

        Self {
            kind,
            path: None,
            source: Some(source),
        }
    }

    /// Attach a path to the error
    pub fn with_path(mut self, path: &std::path::Path) -> Self {
        self.path = Some(path.to_path_buf());
        self
    }
}

impl From<std::io::Error> for Error {
    fn from(source: std::io::Error) -> Self {
        Self::Io(IoError::from_std(source))
    }
}

fn format_io_error(error: &IoError) -> String {
    let base = match &error.kind {
        IoErrorKind::FileNotFound => "file not found",
        IoErrorKind::PermissionDenied => "permission denied",
        IoErrorKind::Other => "I/O error",
    };
    match (&error.path, &error.source) {
        (Some(path), Some(source)) => format!("{base}: {}: {source}", path.display()),
        (Some(path), None) => format!("{base}: {}", path.display()),
        (None, Some(source)) => format!("{base}: {source}"),
        (None, None) => base.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as StdError;
    use std::io;
    use std::path::Path;

    #[test]
    fn test_from_io_error_classifies_kind() {
        let io_error = io::Error::new(io::ErrorKind::NotFound, "no such file");
        let error: Error = io_error.into();

        match error {
            Error::Io(io_err) => assert_eq!(io_err.kind, IoErrorKind::FileNotFound),
            _ => panic!("Expected Io error"),
        }
    }

    #[test]
    fn test_error_display_includes_path() {
        let io_error = io::Error::new(io::ErrorKind::PermissionDenied, "access denied");
        let error = Error::Io(IoError::from_std(io_error).with_path(Path::new("/protected/data")));

        let display = error.to_string();
        assert!(display.contains("permission denied"));
        assert!(display.contains("/protected/data"));
    }

    #[test]
    fn test_error_source_chain() {
        let io_error = io::Error::new(io::ErrorKind::PermissionDenied, "access denied");
        let error = Error::Io(IoError::from_std(io_error));

        assert!(error.source().is_some());
    }

    #[test]
    fn test_error_is_send_and_sync() {
        fn assert_send<T: Send>() {}
        fn assert_sync<T: Sync>() {}

        assert_send::<Error>();
        assert_sync::<Error>();
    }
}
