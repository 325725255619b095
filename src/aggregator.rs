//! Single consumer of the result stream

use crossbeam_channel::Receiver;
use std::sync::Arc;
use std::time::Instant;

use crate::models::{ScanOutcome, ScanResult, ScanStatistics};
use crate::progress::ProgressReporter;
use crate::warning::WarningSink;

/// Owns the running statistics of one scan.
///
/// Only the thread draining the result stream touches it, so the counters
/// are plain integers.
pub struct Aggregator {
    started: Instant,
    statistics: ScanStatistics,
    results: Vec<ScanResult>,
    progress: Option<Arc<ProgressReporter>>,
}

impl Aggregator {
    pub fn new(started: Instant) -> Self {
        Self {
            started,
            statistics: ScanStatistics::new(),
            results: Vec::new(),
            progress: None,
        }
    }

    /// Emit throttled progress messages while aggregating
    pub fn with_progress(mut self, reporter: Arc<ProgressReporter>) -> Self {
        self.progress = Some(reporter);
        self
    }

    pub fn progress(&self) -> Option<&ProgressReporter> {
        self.progress.as_deref()
    }

    /// Account for one result
    pub fn record(&mut self, result: ScanResult) {
        self.statistics.record(&result);
        self.results.push(result);

        if let Some(reporter) = &self.progress {
            let elapsed_ms = self.started.elapsed().as_millis() as u64;
            reporter.report_progress(&self.statistics, elapsed_ms);
        }
    }

    /// Receive until every sender has been dropped
    pub fn drain(&mut self, results: &Receiver<ScanResult>) {
        for result in results.iter() {
            self.record(result);
        }
    }

    /// Running statistics (duration not yet final)
    pub fn statistics(&self) -> &ScanStatistics {
        &self.statistics
    }

    /// Freeze the statistics: stamp elapsed time and warning counts
    pub fn finish(mut self, warnings: &WarningSink) -> ScanOutcome {
        self.statistics.duration_ms = self.started.elapsed().as_millis() as u64;
        self.statistics.warnings = warnings.emitted();
        self.statistics.dropped_warnings = warnings.dropped();

        if let Some(reporter) = &self.progress {
            reporter.report_done(&self.statistics);
        }

        ScanOutcome {
            statistics: self.statistics,
            results: self.results,
        }
    }
}
