use crate::analyzers::grade::submission_status;
use crate::analyzers::types::{QuestionResult, StudentSummary};
use crate::config::QUESTION_PREFIX;
use crate::parser::SubmissionFolder;
use crate::store::DELIMITER;
use std::collections::BTreeSet;

/// Derives the distinct question prefixes of `folder` from the keys listed
/// under it, in sorted order.
///
/// A key contributes its second path segment when that segment starts with
/// `q`; keys belonging to other folders are ignored.
pub fn question_prefixes<'a>(
    folder: &str,
    keys: impl IntoIterator<Item = &'a str>,
) -> BTreeSet<String> {
    keys.into_iter()
        .filter_map(|key| {
            let mut parts = key.split(DELIMITER);
            if parts.next()? != folder {
                return None;
            }
            parts.next().filter(|q| q.starts_with(QUESTION_PREFIX))
        })
        .map(str::to_string)
        .collect()
}

/// Folds a submission's question results into a [`StudentSummary`].
///
/// Errored questions count toward `questions_attempted` but add nothing to
/// either total. The score is the number of passed checks.
pub fn summarize(submission: SubmissionFolder, mut questions: Vec<QuestionResult>) -> StudentSummary {
    questions.sort_by(|a, b| a.question.cmp(&b.question));

    let (total_passed, total_failed) = questions
        .iter()
        .filter_map(QuestionResult::counts)
        .fold((0u32, 0u32), |(p, f), c| (p + c.passed, f + c.failed));

    StudentSummary {
        submission_time: submission.submission_time(),
        submission_date: submission.submission_date(),
        folder: submission.folder,
        student_name: submission.student_name,
        total_score: total_passed,
        total_passed,
        total_failed,
        questions_attempted: questions.len(),
        status: submission_status(total_passed, total_failed),
        questions,
    }
}
