//! Progress reporting module for scan operations
//!
//! When enabled, the scan writes one JSON object per line to stderr: a
//! `start` message, throttled `p` progress messages from the aggregator, an
//! `err` message per warning and a final `done` message.

use serde::Serialize;
use std::io::Write;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use crate::config::ScanConfig;
use crate::error::ScanWarning;
use crate::models::ScanStatistics;

/// Start message sent when scan begins
#[derive(Debug, Clone, Serialize)]
pub struct StartMessage {
    /// Message type identifier
    #[serde(rename = "_t")]
    pub msg_type: &'static str,
    /// Sequence number
    pub seq: u64,
    /// Timestamp in milliseconds since reporter creation
    pub ts: u64,
    /// Scan root path
    pub root: String,
    /// Number of workers
    pub workers: usize,
    /// Recognized extensions
    pub extensions: Vec<String>,
}

impl StartMessage {
    /// Create a new start message
    pub fn new(seq: u64, ts: u64, root: String, workers: usize, extensions: Vec<String>) -> Self {
        Self {
            msg_type: "start",
            seq,
            ts,
            root,
            workers,
            extensions,
        }
    }
}

/// Progress message sent during scan
#[derive(Debug, Clone, Serialize)]
pub struct ProgressMessage {
    /// Message type identifier ("p" for progress)
    #[serde(rename = "_t")]
    pub msg_type: &'static str,
    pub seq: u64,
    pub ts: u64,
    /// Number of files processed
    #[serde(rename = "f")]
    pub files: u64,
    /// Number of recognized files
    #[serde(rename = "r")]
    pub recognized: u64,
    /// Bytes in recognized files
    #[serde(rename = "b")]
    pub bytes: u64,
    /// Elapsed time in milliseconds
    pub ms: u64,
}

impl ProgressMessage {
    /// Create a new progress message
    pub fn new(seq: u64, ts: u64, files: u64, recognized: u64, bytes: u64, ms: u64) -> Self {
        Self {
            msg_type: "p",
            seq,
            ts,
            files,
            recognized,
            bytes,
            ms,
        }
    }
}

/// Error message sent for each non-fatal warning
#[derive(Debug, Clone, Serialize)]
pub struct ErrorProgressMessage {
    /// Message type identifier ("err" for error)
    #[serde(rename = "_t")]
    pub msg_type: &'static str,
    pub seq: u64,
    pub ts: u64,
    /// Warning stage, e.g. "EntryAccess"
    pub error_type: String,
    /// Classified cause, e.g. "PermissionDenied"
    pub cause: String,
    /// Error message description
    pub message: String,
    /// Path that caused the error (if available)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

impl ErrorProgressMessage {
    /// Create an error message from a warning
    pub fn new(seq: u64, ts: u64, warning: &ScanWarning) -> Self {
        Self {
            msg_type: "err",
            seq,
            ts,
            error_type: format!("{:?}", warning.kind),
            cause: format!("{:?}", warning.cause),
            message: warning.message.clone(),
            path: warning
                .path
                .as_ref()
                .map(|p| p.to_string_lossy().to_string()),
        }
    }
}

/// Done message sent when scan completes
#[derive(Debug, Clone, Serialize)]
pub struct DoneMessage {
    /// Message type identifier ("done" for completion)
    #[serde(rename = "_t")]
    pub msg_type: &'static str,
    pub seq: u64,
    pub ts: u64,
    #[serde(rename = "tf")]
    pub total_files: u64,
    #[serde(rename = "rf")]
    pub recognized_files: u64,
    #[serde(rename = "rb")]
    pub recognized_bytes: u64,
    /// Number of warnings emitted
    #[serde(rename = "w")]
    pub warnings: u64,
    /// Total scan duration in milliseconds
    pub ms: u64,
}

impl DoneMessage {
    /// Create a done message from final statistics
    pub fn new(seq: u64, ts: u64, stats: &ScanStatistics) -> Self {
        Self {
            msg_type: "done",
            seq,
            ts,
            total_files: stats.total_files,
            recognized_files: stats.recognized_files,
            recognized_bytes: stats.recognized_bytes,
            warnings: stats.warnings,
            ms: stats.duration_ms,
        }
    }
}

/// Progress reporter for outputting scan progress to stderr
///
/// Shared by the aggregator and the warning sink, so all state is atomic.
#[derive(Debug)]
pub struct ProgressReporter {
    /// Whether progress reporting is enabled
    enabled: bool,
    /// Reporting interval in milliseconds
    interval_ms: u64,
    /// Milliseconds since `start_time` of the last progress message
    last_report_ms: AtomicU64,
    /// Sequence number for messages
    seq: AtomicU64,
    /// Start time of the reporter
    start_time: Instant,
}

impl ProgressReporter {
    /// Create a new ProgressReporter
    ///
    /// # Arguments
    /// * `enabled` - Whether progress reporting is enabled
    /// * `interval_ms` - Minimum interval between progress messages in milliseconds
    pub fn new(enabled: bool, interval_ms: u64) -> Self {
        let now = Instant::now();
        Self {
            enabled,
            interval_ms,
            last_report_ms: AtomicU64::new(0),
            seq: AtomicU64::new(0),
            start_time: now,
        }
    }

    /// Check if enough time has passed since the last report
    pub fn should_report(&self) -> bool {
        if !self.enabled {
            return false;
        }
        let since_last = self
            .current_timestamp()
            .saturating_sub(self.last_report_ms.load(Ordering::Relaxed));
        since_last >= self.interval_ms
    }

    /// Get the next sequence number (monotonically increasing)
    pub fn next_seq(&self) -> u64 {
        self.seq.fetch_add(1, Ordering::SeqCst)
    }

    /// Get the current timestamp in milliseconds since reporter creation
    pub fn current_timestamp(&self) -> u64 {
        self.start_time.elapsed().as_millis() as u64
    }

    /// Output a serializable message to stderr as JSON
    pub fn output_to_stderr<T: Serialize>(&self, msg: &T) {
        if let Ok(json) = serde_json::to_string(msg) {
            eprintln!("{}", json);
            std::io::stderr().flush().ok();
        }
    }

    /// Report scan start
    pub fn report_start(&self, root: &Path, workers: usize, config: &ScanConfig) {
        if !self.enabled {
            return;
        }

        let msg = StartMessage::new(
            self.next_seq(),
            self.current_timestamp(),
            root.to_string_lossy().to_string(),
            workers,
            config.extensions.iter().cloned().collect(),
        );
        self.output_to_stderr(&msg);
    }

    /// Report running statistics.
    ///
    /// Returns true if a message was actually sent (respects interval timing).
    pub fn report_progress(&self, stats: &ScanStatistics, elapsed_ms: u64) -> bool {
        if !self.should_report() {
            return false;
        }

        let msg = ProgressMessage::new(
            self.next_seq(),
            self.current_timestamp(),
            stats.total_files,
            stats.recognized_files,
            stats.recognized_bytes,
            elapsed_ms,
        );
        self.output_to_stderr(&msg);
        self.last_report_ms
            .store(self.current_timestamp(), Ordering::Relaxed);
        true
    }

    /// Report a warning immediately (ignores interval timing)
    pub fn report_warning(&self, warning: &ScanWarning) {
        if !self.enabled {
            return;
        }

        let msg = ErrorProgressMessage::new(self.next_seq(), self.current_timestamp(), warning);
        self.output_to_stderr(&msg);
    }

    /// Report scan completion
    pub fn report_done(&self, stats: &ScanStatistics) {
        if !self.enabled {
            return;
        }

        let msg = DoneMessage::new(self.next_seq(), self.current_timestamp(), stats);
        self.output_to_stderr(&msg);
    }

    /// Check if the reporter is enabled
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_start_message_serialization() {
        let msg = StartMessage::new(1, 100, "/videos".to_string(), 4, vec![".mp4".to_string()]);
        let json = serde_json::to_string(&msg).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed["_t"], "start");
        assert_eq!(parsed["seq"], 1);
        assert_eq!(parsed["ts"], 100);
        assert_eq!(parsed["root"], "/videos");
        assert_eq!(parsed["workers"], 4);
        assert_eq!(parsed["extensions"][0], ".mp4");
    }

    #[test]
    fn test_progress_message_serialization() {
        let msg = ProgressMessage::new(2, 200, 100, 40, 4096, 1500);
        let json = serde_json::to_string(&msg).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed["_t"], "p");
        assert_eq!(parsed["f"], 100);
        assert_eq!(parsed["r"], 40);
        assert_eq!(parsed["b"], 4096);
        assert_eq!(parsed["ms"], 1500);
    }

    #[test]
    fn test_done_message_from_statistics() {
        let stats = ScanStatistics {
            total_files: 3,
            recognized_files: 2,
            recognized_bytes: 3_145_728,
            warnings: 1,
            dropped_warnings: 0,
            duration_ms: 42,
        };
        let json = serde_json::to_string(&DoneMessage::new(7, 50, &stats)).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed["_t"], "done");
        assert_eq!(parsed["seq"], 7);
        assert_eq!(parsed["tf"], 3);
        assert_eq!(parsed["rf"], 2);
        assert_eq!(parsed["rb"], 3_145_728);
        assert_eq!(parsed["w"], 1);
        assert_eq!(parsed["ms"], 42);
    }

    #[test]
    fn test_progress_reporter_sequence_numbers() {
        let reporter = ProgressReporter::new(true, 200);
        assert_eq!(reporter.next_seq(), 0);
        assert_eq!(reporter.next_seq(), 1);
        assert_eq!(reporter.next_seq(), 2);
    }

    #[test]
    fn test_error_message_serialization() {
        use crate::error::{WarningCause, WarningKind};
        use std::path::PathBuf;

        let warning = ScanWarning::new(
            WarningKind::EntryAccess,
            WarningCause::PermissionDenied,
            Some(PathBuf::from("/videos/locked")),
            "Permission denied",
        );
        let json = serde_json::to_string(&ErrorProgressMessage::new(3, 300, &warning)).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed["_t"], "err");
        assert_eq!(parsed["seq"], 3);
        assert_eq!(parsed["error_type"], "EntryAccess");
        assert_eq!(parsed["cause"], "PermissionDenied");
        assert_eq!(parsed["message"], "Permission denied");
        assert_eq!(parsed["path"], "/videos/locked");
    }

    #[test]
    fn test_error_message_without_path() {
        use crate::error::{WarningCause, WarningKind};

        let warning = ScanWarning::new(WarningKind::StatFailure, WarningCause::Io, None, "io");
        let json = serde_json::to_string(&ErrorProgressMessage::new(1, 1, &warning)).unwrap();
        assert!(!json.contains("\"path\""));
    }

    #[test]
    fn test_reporter_is_shareable_across_threads() {
        fn assert_sync<T: Send + Sync>() {}
        assert_sync::<ProgressReporter>();
    }

    #[test]
    fn test_progress_reporter_should_report_timing() {
        let reporter = ProgressReporter::new(true, 10);
        assert!(!reporter.should_report());

        std::thread::sleep(std::time::Duration::from_millis(20));
        assert!(reporter.should_report());
    }

    #[test]
    fn test_disabled_reporter_is_silent() {
        let reporter = ProgressReporter::new(false, 0);
        assert!(!reporter.is_enabled());
        assert!(!reporter.should_report());

        reporter.report_start(Path::new("/videos"), 4, &ScanConfig::default());
        assert!(!reporter.report_progress(&ScanStatistics::new(), 0));
        reporter.report_done(&ScanStatistics::new());
        reporter.report_warning(&ScanWarning::new(
            crate::error::WarningKind::StatFailure,
            crate::error::WarningCause::NotFound,
            None,
            "gone",
        ));

        // Nothing consumed a sequence number
        assert_eq!(reporter.next_seq(), 0);
    }
}
