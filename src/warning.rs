//! Non-blocking warning channel
//!
//! Every non-fatal error is logged through `log::warn!` and counted. If the
//! caller attached a channel, the warning is also offered to it without
//! blocking: when the channel is full the newest warning is dropped. With
//! progress enabled, each warning is also written as an `err` line.

use crossbeam_channel::{Sender, TrySendError};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::error::ScanWarning;
use crate::progress::ProgressReporter;

/// Shared sink for warnings raised by the walker and the workers
#[derive(Debug, Default)]
pub struct WarningSink {
    tx: Option<Sender<ScanWarning>>,
    progress: Option<Arc<ProgressReporter>>,
    emitted: AtomicU64,
    dropped: AtomicU64,
}

impl WarningSink {
    /// Sink that only logs and counts
    pub fn new() -> Self {
        Self::default()
    }

    /// Sink that also forwards warnings to `tx`
    pub fn with_sender(tx: Sender<ScanWarning>) -> Self {
        Self {
            tx: Some(tx),
            ..Self::default()
        }
    }

    /// Also stream every warning through `reporter`
    pub fn with_progress(mut self, reporter: Arc<ProgressReporter>) -> Self {
        self.progress = Some(reporter);
        self
    }

    /// Record a warning. Never blocks.
    pub fn emit(&self, warning: ScanWarning) {
        log::warn!("{}", warning);
        self.emitted.fetch_add(1, Ordering::Relaxed);

        if let Some(reporter) = &self.progress {
            reporter.report_warning(&warning);
        }

        if let Some(tx) = &self.tx {
            match tx.try_send(warning) {
                Ok(()) => {}
                Err(TrySendError::Full(_)) => {
                    self.dropped.fetch_add(1, Ordering::Relaxed);
                }
                // Receiver gone: the caller chose to discard warnings
                Err(TrySendError::Disconnected(_)) => {}
            }
        }
    }

    /// Number of warnings emitted so far
    pub fn emitted(&self) -> u64 {
        self.emitted.load(Ordering::Relaxed)
    }

    /// Number of warnings dropped because the channel was full
    pub fn dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{WarningCause, WarningKind};

    fn warning(n: usize) -> ScanWarning {
        ScanWarning::new(
            WarningKind::EntryAccess,
            WarningCause::Io,
            None,
            format!("warning {}", n),
        )
    }

    #[test]
    fn test_log_only_sink_counts() {
        let sink = WarningSink::new();
        sink.emit(warning(0));
        sink.emit(warning(1));
        assert_eq!(sink.emitted(), 2);
        assert_eq!(sink.dropped(), 0);
    }

    #[test]
    fn test_full_channel_drops_newest() {
        let (tx, rx) = crossbeam_channel::bounded(2);
        let sink = WarningSink::with_sender(tx);
        for n in 0..5 {
            sink.emit(warning(n));
        }

        assert_eq!(sink.emitted(), 5);
        assert_eq!(sink.dropped(), 3);
        let kept: Vec<_> = rx.try_iter().map(|w| w.message).collect();
        assert_eq!(kept, vec!["warning 0", "warning 1"]);
    }

    #[test]
    fn test_progress_reporter_sees_each_warning() {
        let reporter = Arc::new(ProgressReporter::new(true, 60_000));
        let sink = WarningSink::new().with_progress(Arc::clone(&reporter));
        sink.emit(warning(0));
        sink.emit(warning(1));

        // One sequence number consumed per `err` message
        assert_eq!(reporter.next_seq(), 2);
        assert_eq!(sink.emitted(), 2);
    }

    #[test]
    fn test_disconnected_receiver_is_ignored() {
        let (tx, rx) = crossbeam_channel::bounded(1);
        drop(rx);
        let sink = WarningSink::with_sender(tx);
        sink.emit(warning(0));
        assert_eq!(sink.emitted(), 1);
        assert_eq!(sink.dropped(), 0);
    }
}
