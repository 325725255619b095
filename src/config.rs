//! Configuration for the video scanner

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Default number of concurrent workers
pub const DEFAULT_WORKERS: usize = 4;

/// Extensions recognized when none are configured explicitly
pub const DEFAULT_VIDEO_EXTENSIONS: &[&str] = &[
    ".mp4", ".avi", ".mkv", ".mov", ".wmv", ".flv", ".webm", ".m4v",
];

/// Bring an extension into canonical form: lowercase with a single leading dot.
///
/// `"MP4"`, `".mp4"` and `"mp4"` all become `".mp4"`. An empty input stays empty.
pub fn normalize_extension(ext: &str) -> String {
    let trimmed = ext.trim();
    if trimmed.is_empty() {
        return String::new();
    }
    let lower = trimmed.to_lowercase();
    if lower.starts_with('.') {
        lower
    } else {
        format!(".{}", lower)
    }
}

/// Immutable configuration for a scan
///
/// Deserialization goes through the builder, so extensions read from JSON
/// are canonicalized like those set in code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawScanConfig")]
pub struct ScanConfig {
    /// Recognized extensions in canonical form (".mp4")
    pub extensions: BTreeSet<String>,

    /// Number of concurrent workers
    /// 0 means auto-detect from available parallelism
    pub workers: usize,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            extensions: Self::default_extensions(),
            workers: DEFAULT_WORKERS,
        }
    }
}

impl ScanConfig {
    /// Create a config recognizing the given extensions (any case, dot optional)
    pub fn new<I, S>(extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::builder().extensions(extensions).build()
    }

    /// Create a config builder
    pub fn builder() -> ScanConfigBuilder {
        ScanConfigBuilder::new()
    }

    /// Get the default video extensions
    pub fn default_extensions() -> BTreeSet<String> {
        DEFAULT_VIDEO_EXTENSIONS
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    /// Check whether a canonical extension is recognized
    pub fn recognizes(&self, ext: &str) -> bool {
        !ext.is_empty() && self.extensions.contains(ext)
    }

    /// Get the effective number of workers
    pub fn effective_workers(&self) -> usize {
        if self.workers == 0 {
            std::thread::available_parallelism()
                .map(|p| p.get())
                .unwrap_or(DEFAULT_WORKERS)
        } else {
            self.workers
        }
    }
}

/// Wire form of ScanConfig, accepting extensions in any spelling
#[derive(Debug, Deserialize)]
struct RawScanConfig {
    #[serde(default = "default_extension_list")]
    extensions: Vec<String>,
    #[serde(default = "default_workers")]
    workers: usize,
}

fn default_extension_list() -> Vec<String> {
    DEFAULT_VIDEO_EXTENSIONS.iter().map(|s| s.to_string()).collect()
}

fn default_workers() -> usize {
    DEFAULT_WORKERS
}

impl From<RawScanConfig> for ScanConfig {
    fn from(raw: RawScanConfig) -> Self {
        ScanConfig::builder()
            .extensions(raw.extensions)
            .workers(raw.workers)
            .build()
    }
}

/// Builder for ScanConfig
#[derive(Debug, Default)]
pub struct ScanConfigBuilder {
    config: ScanConfig,
}

impl ScanConfigBuilder {
    /// Create a new builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the recognized extensions
    pub fn extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.config.extensions = extensions
            .into_iter()
            .map(|e| normalize_extension(e.as_ref()))
            .filter(|e| !e.is_empty())
            .collect();
        self
    }

    /// Add a recognized extension
    pub fn add_extension(mut self, ext: impl AsRef<str>) -> Self {
        let ext = normalize_extension(ext.as_ref());
        if !ext.is_empty() {
            self.config.extensions.insert(ext);
        }
        self
    }

    /// Set the number of workers
    pub fn workers(mut self, workers: usize) -> Self {
        self.config.workers = workers;
        self
    }

    /// Build the config
    pub fn build(self) -> ScanConfig {
        self.config
    }
}
