//! Dashboard statistics across all habits.
//!
//! - Habit counts by cadence
//! - Completion rate for records dated on or after the start of this week
//! - Best and active streaks, top habits by current streak
//! - Habit counts per category

use crate::streak::compute_streaks;
use crate::types::parse_date;
use crate::{Cadence, Habit, Result, StreakResult};
use chrono::{Datelike, Duration, NaiveDate};
use serde::Serialize;
use std::collections::HashMap;
use uuid::Uuid;

/// Label for habits without a category
pub const UNCATEGORIZED: &str = "Uncategorized";

/// One row of the top streaks table
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct TopStreak {
    pub habit_id: Uuid,
    pub title: String,
    pub current_streak: u32,
    pub longest_streak: u32,
}

#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct CategoryCount {
    pub name: String,
    pub count: usize,
}

/// Aggregate statistics for a set of habits
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct HabitStats {
    pub total: usize,
    pub daily_habits: usize,
    pub weekly_habits: usize,
    pub week_start: NaiveDate,
    pub completions_this_week: usize,
    /// Percentage of this week's records that are completed, rounded
    pub completion_rate: u32,
    pub best_streak: u32,
    pub active_streaks: usize,
    pub top_streaks: Vec<TopStreak>,
    pub categories: Vec<CategoryCount>,
}

/// The Sunday on or before `today`
pub fn week_start(today: NaiveDate) -> NaiveDate {
    today - Duration::days(i64::from(today.weekday().num_days_from_sunday()))
}

/// Summarize habits as of `today`
///
/// Streaks are recomputed against `today` rather than read from the stored
/// counters, so a streak that lapsed since the habit was last saved shows
/// as zero.
pub fn summarize(habits: &[Habit], today: NaiveDate, top_n: usize) -> Result<HabitStats> {
    let start = week_start(today);

    let mut week_records = 0usize;
    let mut week_completed = 0usize;
    let mut streaks: Vec<(&Habit, StreakResult)> = Vec::with_capacity(habits.len());
    let mut categories: HashMap<&str, usize> = HashMap::new();

    for habit in habits {
        for record in &habit.completions {
            let date = parse_date(&record.date)?;
            if date >= start {
                week_records += 1;
                if record.completed {
                    week_completed += 1;
                }
            }
        }

        streaks.push((habit, compute_streaks(&habit.completions, habit.cadence, today)?));

        let category = habit.category.as_deref().unwrap_or(UNCATEGORIZED);
        *categories.entry(category).or_default() += 1;
    }

    let completion_rate = if week_records > 0 {
        ((week_completed as f64 / week_records as f64) * 100.0).round() as u32
    } else {
        0
    };

    let best_streak = streaks
        .iter()
        .map(|(_, s)| s.longest_streak)
        .max()
        .unwrap_or(0);
    let active_streaks = streaks.iter().filter(|(_, s)| s.current_streak > 0).count();

    streaks.sort_by(|(a, sa), (b, sb)| {
        sb.current_streak
            .cmp(&sa.current_streak)
            .then_with(|| a.title.cmp(&b.title))
    });
    let top_streaks = streaks
        .iter()
        .take(top_n)
        .map(|(habit, s)| TopStreak {
            habit_id: habit.id,
            title: habit.title.clone(),
            current_streak: s.current_streak,
            longest_streak: s.longest_streak,
        })
        .collect();

    let mut categories: Vec<CategoryCount> = categories
        .into_iter()
        .map(|(name, count)| CategoryCount {
            name: name.to_string(),
            count,
        })
        .collect();
    categories.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.name.cmp(&b.name)));

    let stats = HabitStats {
        total: habits.len(),
        daily_habits: habits.iter().filter(|h| h.cadence == Cadence::Daily).count(),
        weekly_habits: habits.iter().filter(|h| h.cadence == Cadence::Weekly).count(),
        week_start: start,
        completions_this_week: week_completed,
        completion_rate,
        best_streak,
        active_streaks,
        top_streaks,
        categories,
    };

    tracing::debug!(
        "Summarized {} habits: rate={}%, best={}, active={}",
        stats.total,
        stats.completion_rate,
        stats.best_streak,
        stats.active_streaks
    );

    Ok(stats)
}
