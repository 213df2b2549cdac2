//! Output formatting and CSV export of leaderboards.
//!
//! Supports pretty-printing, JSON serialization, and flat or per-question
//! pivoted CSV tables, optionally gzip-compressed.

use anyhow::{Context, Result, anyhow};
use csv::WriterBuilder;
use flate2::Compression;
use flate2::write::GzEncoder;
use serde::Serialize;
use std::collections::BTreeSet;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::analyzers::types::{Leaderboard, StudentSummary};

/// Logs a leaderboard using Rust's debug pretty-print format.
pub fn print_pretty(leaderboard: &Leaderboard) {
    debug!("{:#?}", leaderboard);
}

/// Serializes a leaderboard as pretty-printed JSON.
pub fn to_json(leaderboard: &Leaderboard) -> Result<String> {
    Ok(serde_json::to_string_pretty(leaderboard)?)
}

/// One row of the flat export table.
#[derive(Debug, Serialize)]
pub struct LeaderboardRow<'a> {
    #[serde(rename = "Student Name")]
    pub student_name: &'a str,
    #[serde(rename = "Submission Time")]
    pub submission_time: &'a str,
    #[serde(rename = "Total Score")]
    pub total_score: u32,
    #[serde(rename = "Total Passed")]
    pub total_passed: u32,
    #[serde(rename = "Total Failed")]
    pub total_failed: u32,
    #[serde(rename = "Questions Attempted")]
    pub questions_attempted: usize,
    #[serde(rename = "Status")]
    pub status: String,
}

impl<'a> From<&'a StudentSummary> for LeaderboardRow<'a> {
    fn from(s: &'a StudentSummary) -> Self {
        LeaderboardRow {
            student_name: s.student_name(),
            submission_time: s.submission_time(),
            total_score: s.total_score(),
            total_passed: s.total_passed(),
            total_failed: s.total_failed(),
            questions_attempted: s.questions_attempted(),
            status: s.status().to_string(),
        }
    }
}

const FLAT_HEADERS: [&str; 7] = [
    "Student Name",
    "Submission Time",
    "Total Score",
    "Total Passed",
    "Total Failed",
    "Questions Attempted",
    "Status",
];

/// Writes one row per student with the summary columns only.
pub fn write_flat<W: Write>(out: W, students: &[&StudentSummary]) -> Result<W> {
    let mut writer = WriterBuilder::new().from_writer(out);

    if students.is_empty() {
        writer.write_record(FLAT_HEADERS)?;
    }
    for student in students {
        writer.serialize(LeaderboardRow::from(*student))?;
    }

    writer.flush()?;
    writer.into_inner().map_err(|e| anyhow!("{}", e.error()))
}

/// Writes one row per student with `{q}_Passed`, `{q}_Failed` and
/// `{q}_Status` columns for every question seen in `students`.
///
/// Unreadable reports are written as `N/A`; questions a student has no
/// folder for are left empty.
pub fn write_pivot<W: Write>(out: W, students: &[&StudentSummary]) -> Result<W> {
    let questions: BTreeSet<&str> = students
        .iter()
        .flat_map(|s| s.questions().iter().map(|q| q.question.as_str()))
        .collect();

    let mut writer = WriterBuilder::new().from_writer(out);

    let mut header: Vec<String> = FLAT_HEADERS.iter().map(|h| h.to_string()).collect();
    for q in &questions {
        header.push(format!("{q}_Passed"));
        header.push(format!("{q}_Failed"));
        header.push(format!("{q}_Status"));
    }
    writer.write_record(&header)?;

    for student in students {
        let mut record = vec![
            student.student_name().to_string(),
            student.submission_time().to_string(),
            student.total_score().to_string(),
            student.total_passed().to_string(),
            student.total_failed().to_string(),
            student.questions_attempted().to_string(),
            student.status().to_string(),
        ];
        for q in &questions {
            match student.question(q) {
                Some(result) => {
                    record.push(result.passed_label());
                    record.push(result.failed_label());
                    record.push(result.status().to_string());
                }
                None => record.extend([String::new(), String::new(), String::new()]),
            }
        }
        writer.write_record(&record)?;
    }

    writer.flush()?;
    writer.into_inner().map_err(|e| anyhow!("{}", e.error()))
}

/// Options controlling how tables are written to disk.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExportOptions {
    pub pivot: bool,
    pub gzip: bool,
}

fn write_table<W: Write>(out: W, students: &[&StudentSummary], options: ExportOptions) -> Result<W> {
    if options.pivot {
        write_pivot(out, students)
    } else {
        write_flat(out, students)
    }
}

/// Writes `students` to `path`, compressing when `options.gzip` is set.
pub fn export_table(path: &Path, students: &[&StudentSummary], options: ExportOptions) -> Result<()> {
    let file = File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;

    if options.gzip {
        let encoder = write_table(GzEncoder::new(file, Compression::default()), students, options)?;
        encoder.finish()?;
    } else {
        write_table(file, students, options)?;
    }

    debug!(path = %path.display(), rows = students.len(), "CSV table written");
    Ok(())
}

fn export_path(dir: &Path, label: &str, options: ExportOptions) -> PathBuf {
    let extension = if options.gzip { "csv.gz" } else { "csv" };
    dir.join(format!("submissions_{label}.{extension}"))
}

/// Writes one table per date group (`submissions_{date}.csv`) and a full
/// report (`submissions_full.csv`) into `dir`, returning the written paths.
pub fn export_leaderboard(dir: &Path, leaderboard: &Leaderboard, options: ExportOptions) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(dir).with_context(|| format!("Failed to create {}", dir.display()))?;

    let mut written = Vec::new();

    for group in leaderboard.groups() {
        let students: Vec<&StudentSummary> = group.students().iter().collect();
        let path = export_path(dir, &group.date().to_string(), options);
        export_table(&path, &students, options)?;
        written.push(path);
    }

    let all: Vec<&StudentSummary> = leaderboard.students().collect();
    let path = export_path(dir, "full", options);
    export_table(&path, &all, options)?;
    written.push(path);

    info!(files = written.len(), dir = %dir.display(), "Export complete");
    Ok(written)
}
