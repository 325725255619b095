//! Core data models for the video scanner

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// A single file that was successfully stat-ed during a scan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanResult {
    /// Path as produced by the walk (absolute when the root is absolute)
    pub path: PathBuf,
    /// File name without path
    pub name: String,
    /// File size in bytes
    pub size: u64,
    /// Extension in canonical form (".mp4"), empty if none
    pub extension: String,
    /// Whether the extension is one of the recognized extensions
    pub recognized: bool,
}

impl ScanResult {
    /// Create a new ScanResult
    pub fn new(
        path: PathBuf,
        name: String,
        size: u64,
        extension: String,
        recognized: bool,
    ) -> Self {
        Self {
            path,
            name,
            size,
            extension,
            recognized,
        }
    }
}

/// Aggregate statistics for one scan invocation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanStatistics {
    /// Total number of files successfully processed
    pub total_files: u64,
    /// Number of files with a recognized extension
    pub recognized_files: u64,
    /// Sum of sizes of recognized files in bytes
    pub recognized_bytes: u64,
    /// Number of non-fatal warnings emitted
    pub warnings: u64,
    /// Warnings that could not be delivered to a full sink
    #[serde(default, skip_serializing_if = "is_zero")]
    pub dropped_warnings: u64,
    /// Total scan duration in milliseconds
    pub duration_ms: u64,
}

fn is_zero(n: &u64) -> bool {
    *n == 0
}

impl ScanStatistics {
    /// Create empty statistics
    pub fn new() -> Self {
        Self::default()
    }

    /// Account for one processed file
    pub fn record(&mut self, result: &ScanResult) {
        self.total_files += 1;
        if result.recognized {
            self.recognized_files += 1;
            self.recognized_bytes += result.size;
        }
    }

    /// Elapsed time in seconds
    pub fn duration_secs(&self) -> f64 {
        self.duration_ms as f64 / 1000.0
    }
}

/// Everything a successful scan returns
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScanOutcome {
    /// Final statistics
    pub statistics: ScanStatistics,
    /// Every processed file, in no particular order
    pub results: Vec<ScanResult>,
}

impl ScanOutcome {
    /// Iterate over recognized results only
    pub fn recognized(&self) -> impl Iterator<Item = &ScanResult> {
        self.results.iter().filter(|r| r.recognized)
    }
}
