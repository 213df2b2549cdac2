//! Submission folder name parser.
//!
//! Folders are named `{name}_{yyyymmdd}{sep}{HHMMSS}` where `sep` is one of
//! `_`, `T`, `-` or nothing, and the time part is optional. The student name
//! may itself contain underscores. Anything else is kept as a raw name with
//! an unknown timestamp.

use chrono::{NaiveDate, NaiveTime};
use regex::Regex;
use serde::{Serialize, Serializer};
use std::fmt;
use std::sync::LazyLock;
use tracing::debug;

static FOLDER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<name>.+?)_(?P<date>\d{8})(?:[_T-]?(?P<time>\d{6}))?$")
        .expect("folder name pattern is valid")
});

/// When a submission was made, as encoded in its folder name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SubmissionStamp {
    pub date: NaiveDate,
    pub time: Option<NaiveTime>,
}

impl fmt::Display for SubmissionStamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.date.format("%Y%m%d"))?;
        if let Some(time) = self.time {
            write!(f, " {}", time.format("%H%M%S"))?;
        }
        Ok(())
    }
}

/// A submission folder split into student name and timestamp.
///
/// `stamp` is `None` when the folder name does not follow the naming
/// convention; `student_name` is then the whole folder name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionFolder {
    pub folder: String,
    pub student_name: String,
    pub stamp: Option<SubmissionStamp>,
}

impl SubmissionFolder {
    /// Timestamp for display: `YYYYMMDD HHMMSS`, or `Unknown`.
    pub fn submission_time(&self) -> String {
        match &self.stamp {
            Some(stamp) => stamp.to_string(),
            None => "Unknown".to_string(),
        }
    }

    /// Date used to group submissions.
    pub fn submission_date(&self) -> SubmissionDate {
        match &self.stamp {
            Some(stamp) => SubmissionDate::Known(stamp.date),
            None => SubmissionDate::Unknown,
        }
    }
}

/// Grouping key for a submission's date.
///
/// Orders newest date first with `Unknown` last, the order groups are shown in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SubmissionDate {
    Known(NaiveDate),
    Unknown,
}

impl Ord for SubmissionDate {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        use std::cmp::Ordering;
        match (self, other) {
            (SubmissionDate::Known(a), SubmissionDate::Known(b)) => b.cmp(a),
            (SubmissionDate::Known(_), SubmissionDate::Unknown) => Ordering::Less,
            (SubmissionDate::Unknown, SubmissionDate::Known(_)) => Ordering::Greater,
            (SubmissionDate::Unknown, SubmissionDate::Unknown) => Ordering::Equal,
        }
    }
}

impl PartialOrd for SubmissionDate {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for SubmissionDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubmissionDate::Known(date) => write!(f, "{}", date.format("%Y%m%d")),
            SubmissionDate::Unknown => write!(f, "Unknown"),
        }
    }
}

impl Serialize for SubmissionDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Parses a folder name (with or without its trailing `/`).
///
/// Never fails: names that do not match the convention, or whose date or
/// time is not a real calendar value, keep the raw folder name and get no
/// timestamp.
pub fn parse_folder_name(folder: &str) -> SubmissionFolder {
    let folder = folder.trim_end_matches('/');

    match parse_stamped(folder) {
        Some((name, stamp)) => SubmissionFolder {
            folder: folder.to_string(),
            student_name: name.to_string(),
            stamp: Some(stamp),
        },
        None => {
            debug!(folder, "Folder name has no parsable timestamp");
            SubmissionFolder {
                folder: folder.to_string(),
                student_name: folder.to_string(),
                stamp: None,
            }
        }
    }
}

fn parse_stamped(folder: &str) -> Option<(&str, SubmissionStamp)> {
    let caps = FOLDER_RE.captures(folder)?;
    let name = caps.name("name")?.as_str();
    let date = NaiveDate::parse_from_str(caps.name("date")?.as_str(), "%Y%m%d").ok()?;
    let time = match caps.name("time") {
        Some(t) => Some(NaiveTime::parse_from_str(t.as_str(), "%H%M%S").ok()?),
        None => None,
    };
    Some((name, SubmissionStamp { date, time }))
}
