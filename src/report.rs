//! Human-readable rendering of scan outcomes

use std::fmt::Write;

use crate::models::ScanOutcome;

const UNIT: u64 = 1024;
const UNIT_PREFIXES: &[u8] = b"KMGTPE";

/// Format a byte count with binary units and two decimals.
///
/// Values below 1024 are printed as whole bytes ("100 B"); otherwise the
/// largest unit keeping the magnitude at or above 1 is used ("1.50 KB").
pub fn format_bytes(bytes: u64) -> String {
    if bytes < UNIT {
        return format!("{} B", bytes);
    }
    let unit = UNIT as f64;
    let mut value = bytes as f64 / unit;
    let mut exp = 0;
    // Decide on the value as printed, so 1023.999 KB becomes 1.00 MB
    while round_cents(value) >= unit && exp + 1 < UNIT_PREFIXES.len() {
        value /= unit;
        exp += 1;
    }
    format!("{:.2} {}B", value, UNIT_PREFIXES[exp] as char)
}

fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Render recognized files followed by a summary block
pub fn render_text(outcome: &ScanOutcome) -> String {
    let mut out = String::new();
    let stats = &outcome.statistics;

    let _ = writeln!(out, "--- Recognized files ---");
    let mut recognized: Vec<_> = outcome.recognized().collect();
    recognized.sort_by(|a, b| a.path.cmp(&b.path));
    if recognized.is_empty() {
        let _ = writeln!(out, "No recognized files found.");
    }
    for result in recognized {
        let _ = writeln!(
            out,
            "{} ({})",
            result.path.display(),
            format_bytes(result.size)
        );
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "--- Scan report ---");
    let _ = writeln!(out, "Elapsed: {:.2} s", stats.duration_secs());
    let _ = writeln!(out, "Files scanned: {}", stats.total_files);
    let _ = writeln!(out, "Recognized files: {}", stats.recognized_files);
    let _ = writeln!(
        out,
        "Recognized size: {}",
        format_bytes(stats.recognized_bytes)
    );
    if stats.warnings > 0 {
        let _ = writeln!(out, "Warnings: {}", stats.warnings);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ScanResult, ScanStatistics};
    use std::path::PathBuf;

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(0), "0 B");
        assert_eq!(format_bytes(100), "100 B");
        assert_eq!(format_bytes(1023), "1023 B");
        assert_eq!(format_bytes(1024), "1.00 KB");
        assert_eq!(format_bytes(1536), "1.50 KB");
        assert_eq!(format_bytes(1_048_576), "1.00 MB");
        assert_eq!(format_bytes(3_145_728), "3.00 MB");
        assert_eq!(format_bytes(5 * 1024 * 1024 * 1024), "5.00 GB");
        assert_eq!(format_bytes(u64::MAX), "16.00 EB");
    }

    #[test]
    fn test_format_bytes_rounds_into_next_unit() {
        assert_eq!(format_bytes(1_048_575), "1.00 MB");
        assert_eq!(format_bytes(1_048_570), "1023.99 KB");
        assert_eq!(format_bytes(1024 * 1024 * 1024 - 1), "1.00 GB");
    }

    #[test]
    fn test_render_text() {
        let outcome = ScanOutcome {
            statistics: ScanStatistics {
                total_files: 2,
                recognized_files: 1,
                recognized_bytes: 1536,
                duration_ms: 1250,
                ..Default::default()
            },
            results: vec![
                ScanResult::new(
                    PathBuf::from("/v/a.mp4"),
                    "a.mp4".into(),
                    1536,
                    ".mp4".into(),
                    true,
                ),
                ScanResult::new(
                    PathBuf::from("/v/b.txt"),
                    "b.txt".into(),
                    10,
                    ".txt".into(),
                    false,
                ),
            ],
        };

        let text = render_text(&outcome);
        assert!(text.contains("/v/a.mp4 (1.50 KB)"));
        assert!(!text.contains("b.txt"));
        assert!(text.contains("Elapsed: 1.25 s"));
        assert!(text.contains("Files scanned: 2"));
        assert!(text.contains("Recognized files: 1"));
        assert!(text.contains("Recognized size: 1.50 KB"));
        assert!(!text.contains("Warnings"));
    }

    #[test]
    fn test_render_text_without_matches() {
        let text = render_text(&ScanOutcome::default());
        assert!(text.contains("No recognized files found."));
        assert!(text.contains("Recognized size: 0 B"));
    }
}
