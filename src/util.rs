// src/util.rs

use anyhow::{Context, Result};
use chrono::DateTime;
use std::path::Path;

/// Read a UTF-8 file into a String with a clear error message.
///
/// This is mainly used for:
/// - workflow input templates
/// - the optional YAML config
pub fn read_to_string(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("Failed to read file {:?}", path))
}

/// Render an epoch timestamp as a UTC string.
///
/// Example:
/// 1700000000, 250_000_000 → `2023-11-14 22:13:20.250 UTC`
pub fn format_utc(secs: i64, nanos: u32) -> String {
    DateTime::from_timestamp(secs, nanos)
        .map(|ts| ts.to_string())
        .unwrap_or_else(|| secs.to_string())
}

/// Segment after the last `/`, or the whole value when there is none.
///
/// Example:
/// arn:aws:batch:us-east-1:123456789012:job-queue/default-gpu → default-gpu
pub fn last_path_segment(value: &str) -> &str {
    value.rsplit('/').next().unwrap_or(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_epoch_as_utc() {
        assert_eq!(format_utc(1_700_000_000, 250_000_000), "2023-11-14 22:13:20.250 UTC");
        assert_eq!(format_utc(0, 0), "1970-01-01 00:00:00 UTC");
    }

    #[test]
    fn last_segment_of_arn() {
        assert_eq!(
            last_path_segment("arn:aws:batch:us-east-1:123456789012:job-queue/default-gpu"),
            "default-gpu"
        );
        assert_eq!(last_path_segment("plain-queue"), "plain-queue");
        assert_eq!(last_path_segment("trailing/"), "");
    }
}
