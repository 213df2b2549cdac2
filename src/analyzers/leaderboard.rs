use crate::analyzers::types::{DateGroup, GroupMetrics, StudentSummary, SubmissionStatus};
use crate::analyzers::utility::mean;
use crate::parser::SubmissionDate;
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// Column a leaderboard table can be ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, clap::ValueEnum)]
pub enum SortKey {
    /// Score descending, then name ascending.
    #[default]
    Score,
    /// Student name ascending.
    Name,
    /// Submission time, most recent first.
    Time,
}

/// Compares two summaries for display. Every key ends in the folder name so
/// the order is total and stable across refreshes.
pub fn compare(a: &StudentSummary, b: &StudentSummary, key: SortKey) -> Ordering {
    let primary = match key {
        SortKey::Score => b
            .total_score()
            .cmp(&a.total_score())
            .then_with(|| a.student_name().cmp(b.student_name())),
        SortKey::Name => a.student_name().cmp(b.student_name()),
        SortKey::Time => a
            .submission_date()
            .cmp(&b.submission_date())
            .then_with(|| b.submission_time().cmp(a.submission_time())),
    };
    primary.then_with(|| a.folder().cmp(b.folder()))
}

/// Sorts summaries in place by `key`.
pub fn sort_students(students: &mut [StudentSummary], key: SortKey) {
    students.sort_by(|a, b| compare(a, b, key));
}

/// Computes the count, mean score and perfect/failed counts for a group.
pub fn group_metrics(students: &[StudentSummary]) -> GroupMetrics {
    let scores: Vec<f64> = students.iter().map(|s| s.total_score() as f64).collect();
    let with_status =
        |status: SubmissionStatus| students.iter().filter(|s| s.status() == status).count();

    GroupMetrics {
        total_students: students.len(),
        avg_score: mean(&scores),
        perfect: with_status(SubmissionStatus::Perfect),
        failed: with_status(SubmissionStatus::Failed),
    }
}

/// Partitions summaries by submission date.
///
/// Groups come newest first with `Unknown` last; students inside a group are
/// ordered by score descending, then name.
pub fn group_by_date(summaries: Vec<StudentSummary>) -> Vec<DateGroup> {
    let mut by_date: BTreeMap<SubmissionDate, Vec<StudentSummary>> = BTreeMap::new();
    for summary in summaries {
        by_date
            .entry(summary.submission_date())
            .or_default()
            .push(summary);
    }

    by_date
        .into_iter()
        .map(|(date, mut students)| {
            sort_students(&mut students, SortKey::Score);
            DateGroup {
                date,
                metrics: group_metrics(&students),
                students,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzers::aggregate::summarize;
    use crate::analyzers::types::QuestionResult;
    use crate::parser::parse_folder_name;
    use crate::stats::ReportCounts;

    fn student(folder: &str, passed: u32, failed: u32) -> StudentSummary {
        summarize(
            parse_folder_name(folder),
            vec![QuestionResult::counted("q1", ReportCounts { passed, failed })],
        )
    }

    #[test]
    fn test_same_date_shares_group() {
        let groups = group_by_date(vec![
            student("alice_20240115_093000", 3, 0),
            student("bob_20240115_101500", 1, 1),
            student("carol_20240116_080000", 0, 2),
        ]);

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].date().to_string(), "20240116");
        assert_eq!(groups[1].date().to_string(), "20240115");
        assert_eq!(groups[1].students().len(), 2);
    }

    #[test]
    fn test_unparseable_date_goes_to_unknown_group_last() {
        let groups = group_by_date(vec![
            student("bob", 1, 0),
            student("alice_20240115_093000", 3, 0),
        ]);

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[1].date(), SubmissionDate::Unknown);
        assert_eq!(groups[1].students()[0].student_name(), "bob");
    }

    #[test]
    fn test_group_sorted_by_score_then_name() {
        let groups = group_by_date(vec![
            student("dave_20240115_090000", 1, 0),
            student("bob_20240115_090000", 2, 0),
            student("alice_20240115_090000", 1, 0),
        ]);

        let names: Vec<_> = groups[0].students().iter().map(|s| s.student_name()).collect();
        assert_eq!(names, vec!["bob", "alice", "dave"]);
    }

    #[test]
    fn test_group_metrics() {
        let students = vec![
            student("a_20240115", 3, 0),
            student("b_20240115", 1, 2),
            student("c_20240115", 0, 2),
            student("d_20240115", 0, 0),
        ];
        let metrics = group_metrics(&students);

        assert_eq!(metrics.total_students(), 4);
        assert_eq!(metrics.avg_score(), 1.0);
        assert_eq!(metrics.perfect(), 1);
        assert_eq!(metrics.failed(), 1);
    }

    #[test]
    fn test_empty_group_metrics() {
        let metrics = group_metrics(&[]);
        assert_eq!(metrics.total_students(), 0);
        assert_eq!(metrics.avg_score(), 0.0);
    }

    #[test]
    fn test_sort_by_name_and_time() {
        let mut students = vec![
            student("carol_20240114_120000", 0, 0),
            student("alice_20240116_080000", 0, 0),
            student("bob_20240115_090000", 0, 0),
        ];

        sort_students(&mut students, SortKey::Name);
        let names: Vec<_> = students.iter().map(|s| s.student_name()).collect();
        assert_eq!(names, vec!["alice", "bob", "carol"]);

        sort_students(&mut students, SortKey::Time);
        let names: Vec<_> = students.iter().map(|s| s.student_name()).collect();
        assert_eq!(names, vec!["alice", "bob", "carol"]);

        students.reverse();
        sort_students(&mut students, SortKey::Score);
        let names: Vec<_> = students.iter().map(|s| s.student_name()).collect();
        assert_eq!(names, vec!["alice", "bob", "carol"]);
    }
}
