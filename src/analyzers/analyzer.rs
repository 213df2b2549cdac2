use crate::analyzers::aggregate::{question_prefixes, summarize};
use crate::analyzers::leaderboard::group_by_date;
use crate::analyzers::types::{Leaderboard, QuestionResult, StudentSummary};
use crate::config::report_key;
use crate::parser::parse_folder_name;
use crate::stats::ReportCounts;
use crate::store::{DELIMITER, ObjectStore};
use anyhow::{Context, Result};
use chrono::Utc;
use tracing::{debug, info, warn};

/// Lists the submission folders at the top of the bucket, sorted, without
/// their trailing `/`.
///
/// # Errors
///
/// Propagates any listing failure from the store.
#[tracing::instrument(skip(store))]
pub async fn list_submissions(store: &dyn ObjectStore) -> Result<Vec<String>> {
    let mut folders: Vec<String> = store
        .list_prefixes("")
        .await
        .context("Failed to list submission folders")?
        .into_iter()
        .map(|p| p.trim_end_matches(DELIMITER).to_string())
        .filter(|p| !p.is_empty())
        .collect();

    folders.sort();
    folders.dedup();

    info!(count = folders.len(), "Submission folders listed");
    Ok(folders)
}

/// Aggregates one submission folder into a [`StudentSummary`].
///
/// Questions are read one after another in sorted order. A report that
/// cannot be fetched or decoded becomes an `Error` result for that question
/// only.
///
/// # Errors
///
/// Fails only if listing the folder's objects fails.
#[tracing::instrument(skip(store))]
pub async fn aggregate_submission(store: &dyn ObjectStore, folder: &str) -> Result<StudentSummary> {
    let folder = folder.trim_end_matches(DELIMITER);
    let submission = parse_folder_name(folder);

    let keys = store
        .list_keys(&format!("{folder}{DELIMITER}"))
        .await
        .with_context(|| format!("Failed to list objects under {folder}"))?;
    let questions = question_prefixes(folder, keys.iter().map(String::as_str));
    debug!(questions = questions.len(), "Question prefixes found");

    let mut results = Vec::with_capacity(questions.len());
    for question in questions {
        results.push(read_question(store, folder, &question).await);
    }

    let summary = summarize(submission, results);
    debug!(
        student = summary.student_name(),
        score = summary.total_score(),
        status = %summary.status(),
        "Submission aggregated"
    );
    Ok(summary)
}

/// Fetches and counts one question's report, turning any failure into an
/// `Error` result.
async fn read_question(store: &dyn ObjectStore, folder: &str, question: &str) -> QuestionResult {
    let key = report_key(folder, question);

    let counts = match store.get_object(&key).await {
        Ok(body) => ReportCounts::from_bytes(&body),
        Err(e) => Err(e),
    };

    match counts {
        Ok(counts) => QuestionResult::counted(question, counts),
        Err(e) => {
            warn!(key = %key, error = %format!("{e:#}"), "Failed to read test report");
            QuestionResult::error(question, format!("{e:#}"))
        }
    }
}

/// Runs one full refresh: lists every submission, aggregates each in turn
/// and groups the results by date.
///
/// # Errors
///
/// Any listing failure aborts the whole refresh.
#[tracing::instrument(skip(store))]
pub async fn build_leaderboard(store: &dyn ObjectStore) -> Result<Leaderboard> {
    let folders = list_submissions(store).await?;

    let mut summaries = Vec::with_capacity(folders.len());
    for folder in &folders {
        summaries.push(aggregate_submission(store, folder).await?);
    }

    let groups = group_by_date(summaries);
    info!(
        students = folders.len(),
        groups = groups.len(),
        "Leaderboard built"
    );

    Ok(Leaderboard {
        generated_at: Utc::now(),
        groups,
    })
}
