//! Concurrent video file scanner
//!
//! A walker enumerates files under a root, a fixed pool of workers stats and
//! classifies them by extension, and a single aggregator folds the results
//! into statistics. Stages hand work over through zero-capacity channels.

pub mod aggregator;
pub mod cancel;
pub mod classifier;
pub mod config;
pub mod error;
pub mod models;
pub mod pool;
pub mod progress;
pub mod report;
pub mod scanner;
pub mod walker;
pub mod warning;

pub use cancel::CancellationToken;
pub use classifier::{classify, extension_of, is_recognized};
pub use config::{normalize_extension, ScanConfig};
pub use error::{ScanError, ScanWarning, WarningCause, WarningKind};
pub use models::{ScanOutcome, ScanResult, ScanStatistics};
pub use report::{format_bytes, render_text};
pub use scanner::{scan, Scanner};
pub use walker::Walker;
pub use warning::WarningSink;
