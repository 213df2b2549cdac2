use anyhow::Result;
use async_trait::async_trait;
use bytes::Bytes;
use submission_tracker::analyzers::analyzer::{
    aggregate_submission, build_leaderboard, list_submissions,
};
use submission_tracker::analyzers::types::{QuestionStatus, SubmissionStatus};
use submission_tracker::parser::SubmissionDate;
use submission_tracker::store::{MemoryStore, ObjectStore};

fn classroom() -> MemoryStore {
    MemoryStore::new()
        .with_object(
            "alice_20240115_093000/q1/test_report.log",
            "test_a ... [PASS]\ntest_b ... [PASS]\ntest_c ... [FAIL]\n",
        )
        .with_object("alice_20240115_093000/q1/solution.py", "def f(): pass")
        .with_object("alice_20240115_093000/q2/solution.py", "def g(): pass")
        .with_object("alice_20240115_093000/q3/test_report.log", "[PASS]")
        .with_object("alice_20240115_093000/notes/readme.md", "[FAIL]")
        .with_object(
            "bob_20240115_101500/q1/test_report.log",
            "[PASS][PASS][PASS]",
        )
        .with_object("carol_20240116_080000/q1/test_report.log", "[FAIL] [FAIL]")
        .with_object("dave/q1/test_report.log", "[PASS]")
        .with_object("erin_20240116_120000/README.txt", "nothing yet")
}

#[tokio::test]
async fn test_list_submissions_strips_delimiter_and_sorts() {
    let folders = list_submissions(&classroom()).await.unwrap();
    assert_eq!(
        folders,
        vec![
            "alice_20240115_093000",
            "bob_20240115_101500",
            "carol_20240116_080000",
            "dave",
            "erin_20240116_120000",
        ]
    );
}

#[tokio::test]
async fn test_aggregate_isolates_unreadable_question() {
    let summary = aggregate_submission(&classroom(), "alice_20240115_093000")
        .await
        .unwrap();

    assert_eq!(summary.student_name(), "alice");
    assert_eq!(summary.questions_attempted(), 3);

    let q1 = summary.question("q1").unwrap();
    assert_eq!((q1.passed(), q1.failed()), (Some(2), Some(1)));
    assert_eq!(q1.status(), QuestionStatus::Partial);

    let q2 = summary.question("q2").unwrap();
    assert_eq!(q2.status(), QuestionStatus::Error);
    assert_eq!(q2.passed_label(), "N/A");

    let q3 = summary.question("q3").unwrap();
    assert_eq!(q3.status(), QuestionStatus::Passed);

    assert!(summary.question("notes").is_none());
    assert_eq!(summary.total_passed(), 3);
    assert_eq!(summary.total_failed(), 1);
    assert_eq!(summary.total_score(), summary.total_passed());
    assert_eq!(summary.status(), SubmissionStatus::Partial);
}

#[tokio::test]
async fn test_full_pipeline_groups_and_orders() {
    let leaderboard = build_leaderboard(&classroom()).await.unwrap();
    let groups = leaderboard.groups();

    let dates: Vec<_> = groups.iter().map(|g| g.date().to_string()).collect();
    assert_eq!(dates, vec!["20240116", "20240115", "Unknown"]);

    let jan_15: Vec<_> = groups[1]
        .students()
        .iter()
        .map(|s| (s.student_name(), s.total_score()))
        .collect();
    assert_eq!(jan_15, vec![("alice", 3), ("bob", 3)]);

    let jan_16 = &groups[0];
    assert_eq!(jan_16.metrics().total_students(), 2);
    assert_eq!(jan_16.metrics().failed(), 1);
    assert_eq!(jan_16.metrics().perfect(), 0);
    let erin = jan_16
        .students()
        .iter()
        .find(|s| s.student_name() == "erin")
        .unwrap();
    assert_eq!(erin.status(), SubmissionStatus::NotStarted);
    assert_eq!(erin.questions_attempted(), 0);

    assert_eq!(groups[2].date(), SubmissionDate::Unknown);
    assert_eq!(groups[2].students()[0].submission_time(), "Unknown");

    for student in leaderboard.students() {
        assert_eq!(student.total_score(), student.total_passed());
    }
}

#[tokio::test]
async fn test_rerun_on_unchanged_storage_is_identical() {
    let store = classroom();
    let first = build_leaderboard(&store).await.unwrap();
    let second = build_leaderboard(&store).await.unwrap();

    assert_eq!(first.groups(), second.groups());
    assert_eq!(
        serde_json::to_string(first.groups()).unwrap(),
        serde_json::to_string(second.groups()).unwrap()
    );
}

/// Lists fine but fails every fetch, as a bucket without read access would.
struct UnreadableStore(MemoryStore);

#[async_trait]
impl ObjectStore for UnreadableStore {
    async fn list_prefixes(&self, prefix: &str) -> Result<Vec<String>> {
        self.0.list_prefixes(prefix).await
    }

    async fn list_keys(&self, prefix: &str) -> Result<Vec<String>> {
        self.0.list_keys(prefix).await
    }

    async fn get_object(&self, key: &str) -> Result<Bytes> {
        anyhow::bail!("AccessDenied: {key}")
    }
}

/// Fails to list, as an unreachable bucket would.
struct UnlistableStore;

#[async_trait]
impl ObjectStore for UnlistableStore {
    async fn list_prefixes(&self, _prefix: &str) -> Result<Vec<String>> {
        anyhow::bail!("NoSuchBucket")
    }

    async fn list_keys(&self, _prefix: &str) -> Result<Vec<String>> {
        anyhow::bail!("NoSuchBucket")
    }

    async fn get_object(&self, _key: &str) -> Result<Bytes> {
        anyhow::bail!("NoSuchBucket")
    }
}

#[tokio::test]
async fn test_fetch_failures_do_not_abort_refresh() {
    let leaderboard = build_leaderboard(&UnreadableStore(classroom()))
        .await
        .unwrap();

    for student in leaderboard.students() {
        assert!(
            student
                .questions()
                .iter()
                .all(|q| q.status() == QuestionStatus::Error)
        );
        assert_eq!(student.status(), SubmissionStatus::NotStarted);
    }
}

#[tokio::test]
async fn test_listing_failure_aborts_refresh() {
    let err = build_leaderboard(&UnlistableStore).await.unwrap_err();
    assert!(format!("{err:#}").contains("NoSuchBucket"));
}

#[tokio::test]
async fn test_invalid_utf8_report_is_error() {
    let store = MemoryStore::new()
        .with_object("frank_20240115/q1/test_report.log", vec![0xFF, 0xFE, 0x00])
        .with_object("frank_20240115/q2/test_report.log", "[PASS]");

    let summary = aggregate_submission(&store, "frank_20240115").await.unwrap();
    assert_eq!(summary.question("q1").unwrap().status(), QuestionStatus::Error);
    assert_eq!(summary.total_passed(), 1);
    assert_eq!(summary.status(), SubmissionStatus::Perfect);
}
