//! Extension-based classification of file names

use crate::config::ScanConfig;

/// Extract the normalized extension of a file name.
///
/// The extension is everything from the last `.` onward, lowercased, so
/// `"Movie.MP4"` yields `".mp4"` and a dotfile such as `".mp4"` yields
/// itself. Names without a dot yield an empty string.
pub fn extension_of(file_name: &str) -> String {
    match file_name.rfind('.') {
        Some(idx) => file_name[idx..].to_lowercase(),
        None => String::new(),
    }
}

/// Whether `file_name` carries one of the recognized extensions
pub fn is_recognized(file_name: &str, config: &ScanConfig) -> bool {
    classify(file_name, config).1
}

/// Normalized extension and recognized flag in one pass
pub fn classify(file_name: &str, config: &ScanConfig) -> (String, bool) {
    let ext = extension_of(file_name);
    let recognized = config.recognizes(&ext);
    (ext, recognized)
}
