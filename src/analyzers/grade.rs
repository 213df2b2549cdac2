use crate::analyzers::types::{QuestionStatus, SubmissionStatus};
use crate::stats::ReportCounts;

/// Classifies a submission from its summed pass/fail totals.
///
/// | passed | failed | Status      |
/// |--------|--------|-------------|
/// | > 0    | 0      | Perfect     |
/// | > 0    | > 0    | Partial     |
/// | 0      | > 0    | Failed      |
/// | 0      | 0      | Not Started |
pub fn submission_status(passed: u32, failed: u32) -> SubmissionStatus {
    match (passed, failed) {
        (p, 0) if p > 0 => SubmissionStatus::Perfect,
        (p, _) if p > 0 => SubmissionStatus::Partial,
        (_, f) if f > 0 => SubmissionStatus::Failed,
        _ => SubmissionStatus::NotStarted,
    }
}

/// Classifies one question. `None` means its report could not be read.
///
/// A report without any markers counts as `Failed`.
pub fn question_status(counts: Option<ReportCounts>) -> QuestionStatus {
    match counts {
        None => QuestionStatus::Error,
        Some(c) if c.passed > 0 && c.failed == 0 => QuestionStatus::Passed,
        Some(c) if c.passed > 0 => QuestionStatus::Partial,
        Some(_) => QuestionStatus::Failed,
    }
}
