//! Submission aggregation and leaderboard building.
//!
//! Lists the submission folders of a bucket, counts the pass/fail markers of
//! every question report, classifies each submission and groups the results
//! by submission date.

pub mod aggregate;
pub mod analyzer;
pub mod grade;
pub mod leaderboard;
pub mod types;
pub mod utility;
