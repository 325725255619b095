//! Directory walker producing candidate file paths

use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::cancel::CancellationToken;
use crate::error::ScanWarning;
use crate::warning::WarningSink;

/// Recursive walk over one root.
///
/// Directories are descended into but never emitted. Regular files and
/// symbolic links are emitted; links are not followed here, the worker
/// stats their target. Per-entry errors become warnings and the walk
/// moves on to the next entry.
pub struct Walker<'a> {
    root: PathBuf,
    warnings: &'a WarningSink,
    cancel: Option<&'a CancellationToken>,
}

impl<'a> Walker<'a> {
    pub fn new(root: impl AsRef<Path>, warnings: &'a WarningSink) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            warnings,
            cancel: None,
        }
    }

    /// Stop yielding paths once `token` is cancelled
    pub fn with_cancellation(mut self, token: &'a CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// Start the walk. Each call starts a fresh traversal.
    pub fn paths(&self) -> Paths<'a> {
        let inner = WalkDir::new(&self.root).follow_links(false).into_iter();
        Paths {
            inner,
            warnings: self.warnings,
            cancel: self.cancel,
        }
    }
}

/// Lazy, finite sequence of file paths from one walk
pub struct Paths<'a> {
    inner: walkdir::IntoIter,
    warnings: &'a WarningSink,
    cancel: Option<&'a CancellationToken>,
}

impl Iterator for Paths<'_> {
    type Item = PathBuf;

    fn next(&mut self) -> Option<PathBuf> {
        loop {
            if self.cancel.is_some_and(|c| c.is_cancelled()) {
                return None;
            }
            match self.inner.next()? {
                Ok(entry) => {
                    let file_type = entry.file_type();
                    if file_type.is_file() || file_type.is_symlink() {
                        return Some(entry.into_path());
                    }
                }
                Err(err) => self.warnings.emit(ScanWarning::from_walk_error(&err)),
            }
        }
    }
}
