//! Habit lifecycle: creation, edits, and completion toggles.
//!
//! Every change to a habit's completions or cadence recomputes its streaks
//! in full through [`crate::streak::compute_streaks`].

use crate::types::{format_date, parse_date};
use crate::{
    Cadence, CompletionRecord, Error, Habit, HabitDraft, HabitPatch, Result, StreakResult,
};
use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

pub const MAX_TITLE_LEN: usize = 100;
pub const MAX_DESCRIPTION_LEN: usize = 500;

fn validate_title(title: &str) -> Result<String> {
    let title = title.trim();
    if title.is_empty() {
        return Err(Error::Validation("Please provide a title".into()));
    }
    if title.chars().count() > MAX_TITLE_LEN {
        return Err(Error::Validation(format!(
            "Title cannot be more than {} characters",
            MAX_TITLE_LEN
        )));
    }
    Ok(title.to_string())
}

fn validate_description(description: &str) -> Result<Option<String>> {
    if description.chars().count() > MAX_DESCRIPTION_LEN {
        return Err(Error::Validation(format!(
            "Description cannot be more than {} characters",
            MAX_DESCRIPTION_LEN
        )));
    }
    Ok((!description.is_empty()).then(|| description.to_string()))
}

fn normalize_category(category: &str) -> Option<String> {
    let category = category.trim();
    (!category.is_empty()).then(|| category.to_string())
}

impl Habit {
    /// Create a validated habit with no completions
    pub fn new(draft: HabitDraft, now: DateTime<Utc>) -> Result<Self> {
        let title = validate_title(&draft.title)?;
        let description = match draft.description {
            Some(d) => validate_description(&d)?,
            None => None,
        };

        Ok(Self {
            id: Uuid::new_v4(),
            title,
            description,
            cadence: draft.cadence,
            category: draft.category.as_deref().and_then(normalize_category),
            completions: Vec::new(),
            current_streak: 0,
            longest_streak: 0,
            created_at: now,
            updated_at: now,
        })
    }

    /// Apply an edit to the habit's fields
    ///
    /// Nothing is changed if any field fails validation. A cadence change
    /// recomputes the streaks, since days and weeks count differently.
    pub fn apply_patch(
        &mut self,
        patch: HabitPatch,
        today: NaiveDate,
        now: DateTime<Utc>,
    ) -> Result<()> {
        let title = patch.title.as_deref().map(validate_title).transpose()?;
        let description = patch
            .description
            .as_deref()
            .map(validate_description)
            .transpose()?;

        if let Some(title) = title {
            self.title = title;
        }
        if let Some(description) = description {
            self.description = description;
        }
        if let Some(category) = patch.category {
            self.category = normalize_category(&category);
        }

        let cadence_changed = patch.cadence.is_some_and(|c| c != self.cadence);
        if let Some(cadence) = patch.cadence {
            self.cadence = cadence;
        }
        if cadence_changed {
            self.recalculate_streaks(today)?;
        }

        self.updated_at = now;
        Ok(())
    }

    /// Mark or unmark the habit for a date
    ///
    /// An existing record for the same date is overwritten in place; otherwise
    /// a new record is appended. Streaks are recomputed afterwards.
    pub fn mark_completion(
        &mut self,
        date: &str,
        completed: bool,
        today: NaiveDate,
        now: DateTime<Utc>,
    ) -> Result<StreakResult> {
        let key = format_date(parse_date(date)?);

        match self.completions.iter_mut().find(|c| c.date == key) {
            Some(existing) => existing.completed = completed,
            None => self.completions.push(CompletionRecord::new(key, completed)),
        }

        self.updated_at = now;
        self.recalculate_streaks(today)
    }

    /// Recompute and store both streak counters
    pub fn recalculate_streaks(&mut self, today: NaiveDate) -> Result<StreakResult> {
        let result = crate::streak::compute_streaks(&self.completions, self.cadence, today)?;
        self.current_streak = result.current_streak;
        self.longest_streak = result.longest_streak;
        Ok(result)
    }

    /// Stored streak counters
    pub fn streaks(&self) -> StreakResult {
        StreakResult {
            current_streak: self.current_streak,
            longest_streak: self.longest_streak,
        }
    }

    /// True if a completed record exists for the date
    pub fn is_completed_on(&self, date: NaiveDate) -> bool {
        let key = format_date(date);
        self.completions
            .iter()
            .any(|c| c.completed && c.date == key)
    }

    /// Period noun used when displaying streaks
    pub fn period_label(&self) -> &'static str {
        match self.cadence {
            Cadence::Daily => "day",
            Cadence::Weekly => "week",
        }
    }
}
