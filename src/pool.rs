//! Fixed-size worker pool turning paths into scan results

use crossbeam_channel::{Receiver, Sender};
use std::fs;
use std::path::PathBuf;

use crate::cancel::CancellationToken;
use crate::classifier;
use crate::config::ScanConfig;
use crate::error::ScanWarning;
use crate::models::ScanResult;
use crate::warning::WarningSink;

/// One worker: stats each path it receives and classifies it
pub struct Worker<'a> {
    id: usize,
    config: &'a ScanConfig,
    warnings: &'a WarningSink,
    cancel: &'a CancellationToken,
}

impl<'a> Worker<'a> {
    pub fn new(
        id: usize,
        config: &'a ScanConfig,
        warnings: &'a WarningSink,
        cancel: &'a CancellationToken,
    ) -> Self {
        Self {
            id,
            config,
            warnings,
            cancel,
        }
    }

    /// Consume paths until the walker hangs up. Returns the number of results sent.
    pub fn run(&self, paths: Receiver<PathBuf>, results: Sender<ScanResult>) -> u64 {
        let mut sent = 0u64;
        for path in paths.iter() {
            // Keep draining after cancellation so the walker never stays blocked
            if self.cancel.is_cancelled() {
                continue;
            }
            let Some(result) = self.process(path) else {
                continue;
            };
            if results.send(result).is_err() {
                log::debug!("worker {}: result stream closed", self.id);
                break;
            }
            sent += 1;
        }
        log::debug!("worker {} exiting after {} results", self.id, sent);
        sent
    }

    /// Stat a single path and build its result. Stat failures become warnings.
    pub fn process(&self, path: PathBuf) -> Option<ScanResult> {
        let metadata = match fs::metadata(&path) {
            Ok(m) => m,
            Err(e) => {
                self.warnings.emit(ScanWarning::stat_failure(path, &e));
                return None;
            }
        };

        // Symlink to a directory or special file
        if !metadata.is_file() {
            log::debug!("skipping non-regular file {:?}", path);
            return None;
        }

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let (extension, recognized) = classifier::classify(&name, self.config);

        Some(ScanResult::new(
            path,
            name,
            metadata.len(),
            extension,
            recognized,
        ))
    }
}

/// `size` workers sharing one path receiver and one result sender
pub struct WorkerPool<'a> {
    size: usize,
    config: &'a ScanConfig,
    warnings: &'a WarningSink,
    cancel: &'a CancellationToken,
}

impl<'a> WorkerPool<'a> {
    pub fn new(
        size: usize,
        config: &'a ScanConfig,
        warnings: &'a WarningSink,
        cancel: &'a CancellationToken,
    ) -> Self {
        Self {
            size: size.max(1),
            config,
            warnings,
            cancel,
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Spawn every worker on `scope`.
    ///
    /// The caller's `paths` and `results` handles are consumed, so the result
    /// stream closes exactly when the last worker exits.
    pub fn spawn<'s>(
        &self,
        scope: &rayon::Scope<'s>,
        paths: Receiver<PathBuf>,
        results: Sender<ScanResult>,
    ) where
        'a: 's,
    {
        for id in 0..self.size {
            let worker = Worker::new(id, self.config, self.warnings, self.cancel);
            let paths = paths.clone();
            let results = results.clone();
            scope.spawn(move |_| {
                worker.run(paths, results);
            });
        }
    }
}
