//! Plain-text rendering of a leaderboard for the terminal.

use chrono::{DateTime, Local};
use std::fmt::Write;

use crate::analyzers::leaderboard::{SortKey, sort_students};
use crate::analyzers::types::{DateGroup, Leaderboard, StudentSummary};

/// Number of question cards shown side by side in a detail card.
const CARD_COLUMNS: usize = 3;

/// Renders the whole dashboard: refresh time, then for every date group its
/// metrics, the sorted table and one detail card per student.
pub fn render(leaderboard: &Leaderboard, last_refreshed: DateTime<Local>, sort: SortKey) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Live Assignment Submission Dashboard");
    let _ = writeln!(out, "Last refreshed at {}", last_refreshed.format("%H:%M:%S"));

    if leaderboard.is_empty() {
        let _ = writeln!(out, "\nNo submissions found.");
        return out;
    }

    for group in leaderboard.groups() {
        render_group(&mut out, group, sort);
    }
    out
}

fn render_group(out: &mut String, group: &DateGroup, sort: SortKey) {
    let metrics = group.metrics();
    let _ = writeln!(out, "\n== Submissions for {} ==", group.date());
    let _ = writeln!(
        out,
        "Total Students: {} | Avg Score: {:.1} | Perfect: {} | Failed: {}",
        metrics.total_students(),
        metrics.avg_score(),
        metrics.perfect(),
        metrics.failed()
    );

    let mut students = group.students().to_vec();
    sort_students(&mut students, sort);

    out.push('\n');
    out.push_str(&render_table(&students));

    for student in &students {
        out.push('\n');
        out.push_str(&render_card(student));
    }
}

/// Renders the summary table, one row per student, in the given order.
pub fn render_table(students: &[StudentSummary]) -> String {
    let name_width = students
        .iter()
        .map(|s| s.student_name().chars().count())
        .chain(["Student Name".len()])
        .max()
        .unwrap_or_default();

    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<name_width$}  {:<15}  {:>5}  {:>6}  {:>6}  {:>9}  Status",
        "Student Name", "Submission Time", "Score", "Passed", "Failed", "Questions"
    );
    for s in students {
        let _ = writeln!(
            out,
            "{:<name_width$}  {:<15}  {:>5}  {:>6}  {:>6}  {:>9}  {}",
            s.student_name(),
            s.submission_time(),
            s.total_score(),
            s.total_passed(),
            s.total_failed(),
            s.questions_attempted(),
            s.status()
        );
    }
    out
}

/// Renders one student's detail card with every question's status.
pub fn render_card(student: &StudentSummary) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "### {} - {}", student.student_name(), student.status());
    let _ = writeln!(
        out,
        "Submitted: {} | Score: {} | Passed: {} | Failed: {}",
        student.submission_time(),
        student.total_score(),
        student.total_passed(),
        student.total_failed()
    );

    for row in student.questions().chunks(CARD_COLUMNS) {
        let cells: Vec<String> = row
            .iter()
            .map(|q| {
                format!(
                    "{} - {} (Passed: {} | Failed: {})",
                    q.question,
                    q.status(),
                    q.passed_label(),
                    q.failed_label()
                )
            })
            .collect();
        let _ = writeln!(out, "  {}", cells.join("    "));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzers::aggregate::summarize;
    use crate::analyzers::leaderboard::group_by_date;
    use crate::analyzers::types::QuestionResult;
    use crate::parser::parse_folder_name;
    use crate::stats::ReportCounts;
    use chrono::Utc;

    fn leaderboard() -> Leaderboard {
        let alice = summarize(
            parse_folder_name("alice_20240115_093000"),
            vec![
                QuestionResult::counted("q1", ReportCounts { passed: 2, failed: 0 }),
                QuestionResult::error("q2", "NoSuchKey"),
            ],
        );
        let bob = summarize(
            parse_folder_name("bob_20240115_100000"),
            vec![QuestionResult::counted("q1", ReportCounts { passed: 0, failed: 1 })],
        );
        Leaderboard {
            generated_at: Utc::now(),
            groups: group_by_date(vec![bob, alice]),
        }
    }

    #[test]
    fn test_render_contains_metrics_and_cards() {
        let out = render(&leaderboard(), Local::now(), SortKey::Score);

        assert!(out.contains("== Submissions for 20240115 =="));
        assert!(out.contains("Total Students: 2 | Avg Score: 1.0 | Perfect: 1 | Failed: 1"));
        assert!(out.contains("### alice - Perfect"));
        assert!(out.contains("q2 - Error (Passed: N/A | Failed: N/A)"));
    }

    #[test]
    fn test_render_table_respects_order() {
        let out = render(&leaderboard(), Local::now(), SortKey::Name);
        let alice = out.find("\nalice ").unwrap();
        let bob = out.find("\nbob ").unwrap();
        assert!(alice < bob);
    }

    #[test]
    fn test_render_empty_leaderboard() {
        let empty = Leaderboard {
            generated_at: Utc::now(),
            groups: Vec::new(),
        };
        assert!(render(&empty, Local::now(), SortKey::Score).contains("No submissions found."));
    }
}
