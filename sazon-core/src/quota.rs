//! Rolling quota for AI recipe generation.
//!
//! A user may generate at most [`DAILY_GENERATION_LIMIT`] recipes per window.
//! The window opens on the first generation after the previous one expired and
//! lasts [`QUOTA_WINDOW_HOURS`] hours; it is not aligned to calendar days.

use chrono::{DateTime, TimeDelta, Utc};

pub const DAILY_GENERATION_LIMIT: i32 = 3;
pub const QUOTA_WINDOW_HOURS: i64 = 24;

/// The two quota fields stored on the user row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuotaState {
    pub generation_count: i32,
    pub last_generation_at: DateTime<Utc>,
}

/// Outcome of checking a generation request against the stored quota.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuotaDecision {
    /// The window expired: start a new one at `now` with a count of 1.
    Reset(QuotaState),
    /// Still inside the window with room left: bump the count, keep the timestamp.
    Increment(QuotaState),
    /// Limit reached. Nothing may be called or written.
    Exceeded,
}

impl QuotaDecision {
    /// State to persist once the generation succeeded, if any.
    pub fn next_state(&self) -> Option<QuotaState> {
        match self {
            QuotaDecision::Reset(state) | QuotaDecision::Increment(state) => Some(*state),
            QuotaDecision::Exceeded => None,
        }
    }
}

pub fn evaluate(current: &QuotaState, now: DateTime<Utc>) -> QuotaDecision {
    let elapsed = now - current.last_generation_at;

    if elapsed >= TimeDelta::hours(QUOTA_WINDOW_HOURS) {
        QuotaDecision::Reset(QuotaState {
            generation_count: 1,
            last_generation_at: now,
        })
    } else if current.generation_count < DAILY_GENERATION_LIMIT {
        QuotaDecision::Increment(QuotaState {
            generation_count: current.generation_count + 1,
            last_generation_at: current.last_generation_at,
        })
    } else {
        QuotaDecision::Exceeded
    }
}
