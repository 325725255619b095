//! Scanner module - wires the walker, worker pool and aggregator together
//!
//! Stages are connected by zero-capacity channels: the walker blocks until a
//! worker takes a path, and a worker blocks until the aggregator takes its
//! result. All stages run on a dedicated rayon pool sized `workers + 2`
//! (walker, workers, and the aggregator on the scope's own thread).

use crossbeam_channel::Sender;
use log::{debug, info};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use crate::aggregator::Aggregator;
use crate::cancel::CancellationToken;
use crate::config::ScanConfig;
use crate::error::{ScanError, ScanWarning};
use crate::models::{ScanOutcome, ScanResult};
use crate::pool::WorkerPool;
use crate::progress::ProgressReporter;
use crate::walker::Walker;
use crate::warning::WarningSink;

/// Scan `root` with `config`, logging warnings only
pub fn scan(root: impl AsRef<Path>, config: &ScanConfig) -> Result<ScanOutcome, ScanError> {
    Scanner::new(config).scan(root)
}

/// Reusable scan driver.
///
/// Every call to [`Scanner::scan`] starts from empty statistics.
pub struct Scanner<'a> {
    config: &'a ScanConfig,
    warning_tx: Option<Sender<ScanWarning>>,
    cancel: CancellationToken,
    progress_interval_ms: Option<u64>,
}

impl<'a> Scanner<'a> {
    pub fn new(config: &'a ScanConfig) -> Self {
        Self {
            config,
            warning_tx: None,
            cancel: CancellationToken::new(),
            progress_interval_ms: None,
        }
    }

    /// Forward warnings to `tx` in addition to logging them.
    ///
    /// Delivery uses `try_send`; warnings that do not fit are dropped and
    /// counted in [`ScanStatistics::dropped_warnings`](crate::ScanStatistics).
    pub fn with_warnings(mut self, tx: Sender<ScanWarning>) -> Self {
        self.warning_tx = Some(tx);
        self
    }

    /// Observe `token`. A cancelled token stays cancelled for later scans.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    /// Write JSON progress lines to stderr at most every `interval_ms`
    pub fn with_progress(mut self, interval_ms: u64) -> Self {
        self.progress_interval_ms = Some(interval_ms);
        self
    }

    /// Handle for cancelling scans run by this scanner
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Run one scan to completion
    pub fn scan(&self, root: impl AsRef<Path>) -> Result<ScanOutcome, ScanError> {
        let root = root.as_ref();
        validate_root(root)?;

        let started = Instant::now();
        let workers = self.config.effective_workers();
        info!("Scanning {:?} with {} workers", root, workers);

        let mut warnings = match &self.warning_tx {
            Some(tx) => WarningSink::with_sender(tx.clone()),
            None => WarningSink::new(),
        };

        let mut aggregator = Aggregator::new(started);
        if let Some(interval_ms) = self.progress_interval_ms {
            let reporter = Arc::new(ProgressReporter::new(true, interval_ms));
            reporter.report_start(root, workers, self.config);
            warnings = warnings.with_progress(Arc::clone(&reporter));
            aggregator = aggregator.with_progress(reporter);
        }

        let thread_pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers + 2)
            .thread_name(|i| format!("scan-{}", i))
            .build()?;

        let (path_tx, path_rx) = crossbeam_channel::bounded::<PathBuf>(0);
        let (result_tx, result_rx) = crossbeam_channel::bounded::<ScanResult>(0);

        let walker = Walker::new(root, &warnings).with_cancellation(&self.cancel);
        let worker_pool = WorkerPool::new(workers, self.config, &warnings, &self.cancel);

        let outcome = thread_pool.scope(|s| {
            s.spawn(move |_| {
                let mut emitted = 0u64;
                for path in walker.paths() {
                    if path_tx.send(path).is_err() {
                        break;
                    }
                    emitted += 1;
                }
                debug!("walker finished after {} paths", emitted);
            });

            worker_pool.spawn(s, path_rx, result_tx);

            aggregator.drain(&result_rx);
            aggregator.finish(&warnings)
        });

        if self.cancel.is_cancelled() {
            info!("Scan of {:?} cancelled", root);
            return Err(ScanError::Cancelled);
        }

        let stats = &outcome.statistics;
        info!(
            "Scan finished: {} files, {} recognized ({} bytes), {} warnings in {}ms",
            stats.total_files,
            stats.recognized_files,
            stats.recognized_bytes,
            stats.warnings,
            stats.duration_ms
        );
        Ok(outcome)
    }
}

/// The root must be an existing, listable directory
fn validate_root(root: &Path) -> Result<(), ScanError> {
    match fs::metadata(root) {
        Ok(metadata) if metadata.is_dir() => {}
        Ok(_) => {
            debug!("root {:?} is not a directory", root);
            return Err(ScanError::root_not_found(root));
        }
        Err(e) => {
            debug!("cannot stat root {:?}: {}", root, e);
            return Err(ScanError::root_not_found(root));
        }
    }

    if let Err(e) = fs::read_dir(root) {
        debug!("cannot list root {:?}: {}", root, e);
        return Err(ScanError::root_not_found(root));
    }
    Ok(())
}
