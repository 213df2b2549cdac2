//! Pass/fail counting over a question's test report.

use anyhow::{Context, Result};
use serde::Serialize;

use crate::config::{FAIL_MARKER, PASS_MARKER};

/// Marker counts found in one test report.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ReportCounts {
    pub passed: u32,
    pub failed: u32,
}

impl ReportCounts {
    /// Counts non-overlapping occurrences of the pass and fail markers.
    pub fn from_text(text: &str) -> Self {
        ReportCounts {
            passed: text.matches(PASS_MARKER).count() as u32,
            failed: text.matches(FAIL_MARKER).count() as u32,
        }
    }

    /// Decodes `bytes` as UTF-8 and counts its markers.
    ///
    /// # Errors
    ///
    /// Returns an error if the report is not valid UTF-8.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let text = std::str::from_utf8(bytes).context("Test report is not valid UTF-8")?;
        Ok(Self::from_text(text))
    }
}
