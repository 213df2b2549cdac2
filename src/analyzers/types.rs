//! Data types used by the aggregation pipeline.

use chrono::{DateTime, Utc};
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use std::fmt;

use crate::parser::SubmissionDate;
use crate::stats::ReportCounts;

/// Placeholder written wherever a count could not be computed.
pub const NOT_AVAILABLE: &str = "N/A";

/// Classification of a single question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum QuestionStatus {
    Passed,
    Partial,
    Failed,
    Error,
}

impl fmt::Display for QuestionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            QuestionStatus::Passed => "Passed",
            QuestionStatus::Partial => "Partial",
            QuestionStatus::Failed => "Failed",
            QuestionStatus::Error => "Error",
        };
        f.write_str(label)
    }
}

/// Classification of a whole submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum SubmissionStatus {
    Perfect,
    Partial,
    Failed,
    #[serde(rename = "Not Started")]
    NotStarted,
}

impl fmt::Display for SubmissionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SubmissionStatus::Perfect => "Perfect",
            SubmissionStatus::Partial => "Partial",
            SubmissionStatus::Failed => "Failed",
            SubmissionStatus::NotStarted => "Not Started",
        };
        f.write_str(label)
    }
}

/// What reading a question's report produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuestionOutcome {
    Counted(ReportCounts),
    /// The report could not be fetched or decoded.
    Error { reason: String },
}

/// Result for one question prefix of a submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionResult {
    pub question: String,
    pub outcome: QuestionOutcome,
}

impl QuestionResult {
    pub fn counted(question: impl Into<String>, counts: ReportCounts) -> Self {
        Self {
            question: question.into(),
            outcome: QuestionOutcome::Counted(counts),
        }
    }

    pub fn error(question: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            outcome: QuestionOutcome::Error {
                reason: reason.into(),
            },
        }
    }

    pub fn counts(&self) -> Option<ReportCounts> {
        match &self.outcome {
            QuestionOutcome::Counted(counts) => Some(*counts),
            QuestionOutcome::Error { .. } => None,
        }
    }

    pub fn passed(&self) -> Option<u32> {
        self.counts().map(|c| c.passed)
    }

    pub fn failed(&self) -> Option<u32> {
        self.counts().map(|c| c.failed)
    }

    pub fn status(&self) -> QuestionStatus {
        super::grade::question_status(self.counts())
    }

    /// Passed count for display, `N/A` on error.
    pub fn passed_label(&self) -> String {
        count_label(self.passed())
    }

    /// Failed count for display, `N/A` on error.
    pub fn failed_label(&self) -> String {
        count_label(self.failed())
    }
}

fn count_label(count: Option<u32>) -> String {
    count.map_or_else(|| NOT_AVAILABLE.to_string(), |c| c.to_string())
}

impl Serialize for QuestionResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("QuestionResult", 5)?;
        s.serialize_field("question", &self.question)?;
        match &self.outcome {
            QuestionOutcome::Counted(counts) => {
                s.serialize_field("passed", &counts.passed)?;
                s.serialize_field("failed", &counts.failed)?;
                s.serialize_field("status", &self.status())?;
                s.skip_field("error")?;
            }
            QuestionOutcome::Error { reason } => {
                s.serialize_field("passed", NOT_AVAILABLE)?;
                s.serialize_field("failed", NOT_AVAILABLE)?;
                s.serialize_field("status", &self.status())?;
                s.serialize_field("error", reason)?;
            }
        }
        s.end()
    }
}

/// Aggregated result of one submission folder.
///
/// Built only by [`super::aggregate::summarize`], which keeps the totals,
/// score and status consistent with `questions`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StudentSummary {
    pub(crate) folder: String,
    pub(crate) student_name: String,
    pub(crate) submission_time: String,
    pub(crate) submission_date: SubmissionDate,
    pub(crate) total_score: u32,
    pub(crate) total_passed: u32,
    pub(crate) total_failed: u32,
    pub(crate) questions_attempted: usize,
    pub(crate) status: SubmissionStatus,
    pub(crate) questions: Vec<QuestionResult>,
}

impl StudentSummary {
    pub fn folder(&self) -> &str {
        &self.folder
    }

    pub fn student_name(&self) -> &str {
        &self.student_name
    }

    pub fn submission_time(&self) -> &str {
        &self.submission_time
    }

    pub fn submission_date(&self) -> SubmissionDate {
        self.submission_date
    }

    pub fn total_score(&self) -> u32 {
        self.total_score
    }

    pub fn total_passed(&self) -> u32 {
        self.total_passed
    }

    pub fn total_failed(&self) -> u32 {
        self.total_failed
    }

    pub fn questions_attempted(&self) -> usize {
        self.questions_attempted
    }

    pub fn status(&self) -> SubmissionStatus {
        self.status
    }

    /// Per-question results in sorted question order.
    pub fn questions(&self) -> &[QuestionResult] {
        &self.questions
    }

    pub fn question(&self, question: &str) -> Option<&QuestionResult> {
        self.questions.iter().find(|q| q.question == question)
    }
}

/// Summary metrics for one date group.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupMetrics {
    pub(crate) total_students: usize,
    pub(crate) avg_score: f64,
    pub(crate) perfect: usize,
    pub(crate) failed: usize,
}

impl GroupMetrics {
    pub fn total_students(&self) -> usize {
        self.total_students
    }

    pub fn avg_score(&self) -> f64 {
        self.avg_score
    }

    pub fn perfect(&self) -> usize {
        self.perfect
    }

    pub fn failed(&self) -> usize {
        self.failed
    }
}

/// All submissions made on one date, in display order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DateGroup {
    pub(crate) date: SubmissionDate,
    pub(crate) metrics: GroupMetrics,
    pub(crate) students: Vec<StudentSummary>,
}

impl DateGroup {
    pub fn date(&self) -> SubmissionDate {
        self.date
    }

    pub fn metrics(&self) -> &GroupMetrics {
        &self.metrics
    }

    pub fn students(&self) -> &[StudentSummary] {
        &self.students
    }
}

/// Result of one refresh: every submission, grouped by date.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Leaderboard {
    pub(crate) generated_at: DateTime<Utc>,
    pub(crate) groups: Vec<DateGroup>,
}

impl Leaderboard {
    pub fn generated_at(&self) -> DateTime<Utc> {
        self.generated_at
    }

    /// Date groups, newest first with `Unknown` last.
    pub fn groups(&self) -> &[DateGroup] {
        &self.groups
    }

    /// Every submission across all groups, in group then display order.
    pub fn students(&self) -> impl Iterator<Item = &StudentSummary> {
        self.groups.iter().flat_map(|g| g.students.iter())
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_result_has_no_counts() {
        let result = QuestionResult::error("q1", "NoSuchKey");
        assert_eq!(result.passed(), None);
        assert_eq!(result.failed(), None);
        assert_eq!(result.passed_label(), "N/A");
        assert_eq!(result.failed_label(), "N/A");
        assert_eq!(result.status(), QuestionStatus::Error);
    }

    #[test]
    fn test_counted_result_labels() {
        let result = QuestionResult::counted("q2", ReportCounts { passed: 2, failed: 1 });
        assert_eq!(result.passed_label(), "2");
        assert_eq!(result.failed_label(), "1");
        assert_eq!(result.status(), QuestionStatus::Partial);
    }

    #[test]
    fn test_question_result_json() {
        let ok = QuestionResult::counted("q1", ReportCounts { passed: 3, failed: 0 });
        let json = serde_json::to_value(&ok).unwrap();
        assert_eq!(json["passed"], 3);
        assert_eq!(json["status"], "Passed");
        assert!(json.get("error").is_none());

        let err = QuestionResult::error("q2", "boom");
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["passed"], "N/A");
        assert_eq!(json["status"], "Error");
        assert_eq!(json["error"], "boom");
    }

    #[test]
    fn test_status_labels() {
        assert_eq!(SubmissionStatus::NotStarted.to_string(), "Not Started");
        assert_eq!(
            serde_json::to_value(SubmissionStatus::NotStarted).unwrap(),
            "Not Started"
        );
        assert_eq!(QuestionStatus::Error.to_string(), "Error");
    }
}
