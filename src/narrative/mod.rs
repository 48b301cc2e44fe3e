//! Canned-narrative generation over aggregated buckets: a chronological
//! timeline of emotional moments plus a single whole-session analysis. All
//! text is selected from the classifier's rule tables by deterministic
//! templates, so identical buckets always produce identical narratives.

pub mod overall;
pub mod timeline;

pub use overall::{build_overall, OverallAnalysis};
pub use timeline::{build_timeline, TimelineEntry};

/// Format a millisecond offset from session start as `m:ss`.
pub(crate) fn format_timestamp(timestamp_ms: u64) -> String {
    let total_secs = timestamp_ms / 1000;
    format!("{}:{:02}", total_secs / 60, total_secs % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timestamps_format_as_minutes_and_seconds() {
        assert_eq!(format_timestamp(0), "0:00");
        assert_eq!(format_timestamp(9_000), "0:09");
        assert_eq!(format_timestamp(75_000), "1:15");
        assert_eq!(format_timestamp(600_000), "10:00");
    }
}
