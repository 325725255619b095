//! Error types for the video scanner

use std::path::PathBuf;
use thiserror::Error;

/// Fatal errors that abort a scan before or instead of producing statistics
#[derive(Debug, Error)]
pub enum ScanError {
    /// The root path does not exist, cannot be read, or is not a directory
    #[error("root not found or not a directory: {}", path.display())]
    RootNotFound { path: PathBuf },

    /// The scan observed a cancellation request
    #[error("scan cancelled")]
    Cancelled,

    /// The worker thread pool could not be created
    #[error("failed to build worker pool: {0}")]
    ThreadPool(String),
}

impl ScanError {
    /// Create a root not found error
    pub fn root_not_found(path: impl Into<PathBuf>) -> Self {
        Self::RootNotFound { path: path.into() }
    }
}

impl From<rayon::ThreadPoolBuildError> for ScanError {
    fn from(err: rayon::ThreadPoolBuildError) -> Self {
        Self::ThreadPool(err.to_string())
    }
}

/// Stage in which a non-fatal error was encountered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarningKind {
    /// A file or subdirectory could not be read during traversal
    EntryAccess,
    /// An enumerated path failed the worker's stat
    StatFailure,
}

/// Underlying cause of a warning
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarningCause {
    /// Permission denied when accessing a file or directory
    PermissionDenied,
    /// File or directory vanished, or a symlink target is missing
    NotFound,
    /// Any other I/O error, including symlink loops
    Io,
}

impl From<std::io::ErrorKind> for WarningCause {
    fn from(kind: std::io::ErrorKind) -> Self {
        match kind {
            std::io::ErrorKind::PermissionDenied => WarningCause::PermissionDenied,
            std::io::ErrorKind::NotFound => WarningCause::NotFound,
            _ => WarningCause::Io,
        }
    }
}

/// A non-fatal, per-entry error. The affected entry is skipped.
#[derive(Debug, Clone, Error)]
#[error("{kind:?} ({cause:?}): {message} (path: {path:?})")]
pub struct ScanWarning {
    /// Stage that hit the error
    pub kind: WarningKind,
    /// Classified cause
    pub cause: WarningCause,
    /// The path where the error occurred, if known
    pub path: Option<PathBuf>,
    /// Human-readable error message
    pub message: String,
}

impl ScanWarning {
    /// Create a new warning
    pub fn new(
        kind: WarningKind,
        cause: WarningCause,
        path: Option<PathBuf>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            cause,
            path,
            message: message.into(),
        }
    }

    /// Build an entry access warning from a traversal error
    pub fn from_walk_error(err: &walkdir::Error) -> Self {
        let cause = err
            .io_error()
            .map(|e| WarningCause::from(e.kind()))
            .unwrap_or(WarningCause::Io);
        Self::new(
            WarningKind::EntryAccess,
            cause,
            err.path().map(|p| p.to_path_buf()),
            err.to_string(),
        )
    }

    /// Build a stat failure warning from an I/O error on `path`
    pub fn stat_failure(path: PathBuf, err: &std::io::Error) -> Self {
        Self::new(
            WarningKind::StatFailure,
            WarningCause::from(err.kind()),
            Some(path),
            err.to_string(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_not_found_display() {
        let err = ScanError::root_not_found("/no/such/dir");
        assert!(err.to_string().contains("/no/such/dir"));
        assert!(matches!(err, ScanError::RootNotFound { .. }));
    }

    #[test]
    fn test_cause_from_io_kind() {
        use std::io::ErrorKind;
        assert_eq!(
            WarningCause::from(ErrorKind::PermissionDenied),
            WarningCause::PermissionDenied
        );
        assert_eq!(WarningCause::from(ErrorKind::NotFound), WarningCause::NotFound);
        assert_eq!(WarningCause::from(ErrorKind::Other), WarningCause::Io);
    }

    #[test]
    fn test_stat_failure_warning() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let warning = ScanWarning::stat_failure(PathBuf::from("/tmp/x.mp4"), &io);
        assert_eq!(warning.kind, WarningKind::StatFailure);
        assert_eq!(warning.cause, WarningCause::NotFound);
        assert_eq!(warning.path, Some(PathBuf::from("/tmp/x.mp4")));
        assert!(warning.to_string().contains("gone"));
    }
}
