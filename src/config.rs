//! Fixed settings of the tracker.
//!
//! Credentials and region come from the AWS environment; everything else is
//! a constant that the CLI exposes as a default.

use std::time::Duration;

/// Bucket holding one folder per student submission.
pub const BUCKET_NAME: &str = "ltisubmissions";

/// Seconds between automatic refreshes of the leaderboard.
pub const REFRESH_INTERVAL_SECS: u64 = 10;

/// Name of the per-question report object.
pub const REPORT_FILE_NAME: &str = "test_report.log";

/// Prefix a folder segment must start with to count as a question.
pub const QUESTION_PREFIX: &str = "q";

/// Literal marker the test runner writes for each passing check.
pub const PASS_MARKER: &str = "[PASS]";

/// Literal marker the test runner writes for each failing check.
pub const FAIL_MARKER: &str = "[FAIL]";

pub fn refresh_interval() -> Duration {
    Duration::from_secs(REFRESH_INTERVAL_SECS)
}

/// Key of the report object for `question` inside `folder`.
pub fn report_key(folder: &str, question: &str) -> String {
    format!("{folder}/{question}/{REPORT_FILE_NAME}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_key() {
        assert_eq!(
            report_key("alice_20240115_093000", "q1"),
            "alice_20240115_093000/q1/test_report.log"
        );
    }

    #[test]
    fn test_refresh_interval_is_ten_seconds() {
        assert_eq!(refresh_interval(), Duration::from_secs(10));
    }
}
