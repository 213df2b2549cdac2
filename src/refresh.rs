//! Refresh bookkeeping for the polling dashboard.
//!
//! The caller owns a [`RefreshState`] and asks it whether a refresh is due;
//! each refresh replaces the cached leaderboard wholesale.

use anyhow::Result;
use chrono::{DateTime, Utc};
use std::time::Duration;
use tracing::{error, info};

use crate::analyzers::analyzer::build_leaderboard;
use crate::analyzers::types::Leaderboard;
use crate::store::ObjectStore;

/// Decides whether a refresh should run now.
///
/// True when the user asked for one, when nothing has been loaded yet, or
/// when strictly more than `interval` has passed since the last attempt. A
/// clock that moved backwards never triggers a refresh on its own.
pub fn should_refresh(
    last_refresh_at: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
    interval: Duration,
    manual: bool,
) -> bool {
    if manual {
        return true;
    }
    match last_refresh_at {
        None => true,
        Some(last) => (now - last).to_std().is_ok_and(|elapsed| elapsed > interval),
    }
}

/// Outcome of [`RefreshState::refresh_if_due`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// The interval had not elapsed and no manual refresh was requested.
    Skipped,
    /// A new leaderboard replaced the cached one.
    Refreshed,
    /// The refresh failed; the previous leaderboard, if any, is kept.
    Failed,
}

#[derive(Debug, Default, Clone)]
pub struct RefreshState {
    last_refresh_at: Option<DateTime<Utc>>,
    cached: Option<Leaderboard>,
}

impl RefreshState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Time of the last refresh attempt, successful or not.
    pub fn last_refresh_at(&self) -> Option<DateTime<Utc>> {
        self.last_refresh_at
    }

    /// The most recent successfully built leaderboard.
    pub fn cached(&self) -> Option<&Leaderboard> {
        self.cached.as_ref()
    }

    pub fn is_due(&self, now: DateTime<Utc>, interval: Duration, manual: bool) -> bool {
        should_refresh(self.last_refresh_at, now, interval, manual)
    }

    /// Replaces the cached leaderboard.
    pub fn record_success(&mut self, now: DateTime<Utc>, leaderboard: Leaderboard) {
        self.last_refresh_at = Some(now);
        self.cached = Some(leaderboard);
    }

    /// Marks an attempt without touching the cached leaderboard, so the next
    /// attempt waits a full interval.
    pub fn record_failure(&mut self, now: DateTime<Utc>) {
        self.last_refresh_at = Some(now);
    }

    /// Rebuilds the leaderboard from `store` when a refresh is due.
    ///
    /// Failures are logged and leave the previous leaderboard in place.
    pub async fn refresh_if_due(
        &mut self,
        store: &dyn ObjectStore,
        now: DateTime<Utc>,
        interval: Duration,
        manual: bool,
    ) -> RefreshOutcome {
        if !self.is_due(now, interval, manual) {
            return RefreshOutcome::Skipped;
        }

        match build_leaderboard(store).await {
            Ok(leaderboard) => {
                info!(manual, "Leaderboard refreshed");
                self.record_success(now, leaderboard);
                RefreshOutcome::Refreshed
            }
            Err(e) => {
                error!(error = %format!("{e:#}"), "Refresh failed, keeping previous data");
                self.record_failure(now);
                RefreshOutcome::Failed
            }
        }
    }

    /// Forces a refresh and returns the new leaderboard.
    ///
    /// # Errors
    ///
    /// Returns the listing error instead of swallowing it; the cached
    /// leaderboard is left unchanged in that case.
    pub async fn refresh(&mut self, store: &dyn ObjectStore, now: DateTime<Utc>) -> Result<&Leaderboard> {
        match build_leaderboard(store).await {
            Ok(leaderboard) => {
                self.last_refresh_at = Some(now);
                Ok(&*self.cached.insert(leaderboard))
            }
            Err(e) => {
                self.record_failure(now);
                Err(e)
            }
        }
    }
}
