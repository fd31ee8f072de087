//! Streak calculation from a habit's completion history.
//!
//! The engine is a pure function of `(records, cadence, today)`:
//! - records are de-duplicated by calendar date, last write wins
//! - `completed: false` records are dropped
//! - the remaining dates are walked in ascending order as days or ISO weeks
//!
//! A run extends when a period immediately follows the previous one and breaks
//! on any larger gap. After a break the counter restarts at 1 if the new
//! period is inside the grace window (today or yesterday, this week or last
//! week) and at 0 otherwise, so the period that ends a gap outside the window
//! is not counted. The current streak is the counter at the last completed
//! period while that period is inside the grace window. The longest streak is
//! the highest the counter reaches and ignores the final liveness check.

use crate::types::parse_date;
use crate::week::WeekId;
use crate::{Cadence, CompletionRecord, Result, StreakResult};
use chrono::{Duration, NaiveDate};
use std::collections::BTreeMap;

/// Compute current and longest streaks for a completion history
///
/// Every record's date must parse as `YYYY-MM-DD`; the first malformed date
/// fails the whole computation with [`crate::Error::MalformedDate`].
pub fn compute_streaks(
    records: &[CompletionRecord],
    cadence: Cadence,
    today: NaiveDate,
) -> Result<StreakResult> {
    let dates = completed_dates(records)?;

    let result = match cadence {
        Cadence::Daily => {
            let yesterday = today - Duration::days(1);
            walk(
                &dates,
                |curr, prev| (curr - prev).num_days() == 1,
                |d| d == today || d == yesterday,
            )
        }
        Cadence::Weekly => {
            let weeks: Vec<WeekId> = dates.iter().map(|d| WeekId::of(*d)).collect();
            let this_week = WeekId::of(today);
            let last_week = WeekId::of(today - Duration::days(7));
            walk(
                &weeks,
                |curr, prev| curr.follows(prev),
                |w| w == this_week || w == last_week,
            )
        }
    };

    tracing::debug!(
        "Computed {} streaks over {} completions as of {}: current={}, longest={}",
        cadence,
        dates.len(),
        today,
        result.current_streak,
        result.longest_streak
    );

    Ok(result)
}

/// Completed dates in ascending order, one per calendar day
fn completed_dates(records: &[CompletionRecord]) -> Result<Vec<NaiveDate>> {
    let mut by_date = BTreeMap::new();
    for record in records {
        by_date.insert(parse_date(&record.date)?, record.completed);
    }

    Ok(by_date
        .into_iter()
        .filter_map(|(date, completed)| completed.then_some(date))
        .collect())
}

/// Walk sorted periods, tracking the streak counter as it goes
///
/// Equal neighbours (two days in the same ISO week) neither extend nor break
/// the run. The first period seeds the counter at 1.
fn walk<P, F, R>(periods: &[P], follows: F, is_recent: R) -> StreakResult
where
    P: Copy + PartialEq,
    F: Fn(P, P) -> bool,
    R: Fn(P) -> bool,
{
    let Some(&last) = periods.last() else {
        return StreakResult::default();
    };

    let mut run = 1u32;
    let mut longest = 1u32;

    for pair in periods.windows(2) {
        let (prev, curr) = (pair[0], pair[1]);
        if curr == prev {
            continue;
        }
        if follows(curr, prev) {
            run += 1;
        } else if is_recent(curr) {
            run = 1;
        } else {
            run = 0;
        }
        longest = longest.max(run);
    }

    // Liveness only affects the current streak.
    let current = if is_recent(last) { run } else { 0 };

    StreakResult {
        current_streak: current,
        longest_streak: longest,
    }
}
