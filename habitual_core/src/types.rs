//! Core domain types for habit tracking.
//!
//! This module defines the fundamental types used throughout the system:
//! - Cadence of a habit (daily or weekly)
//! - Completion records keyed by calendar date
//! - Derived streak results
//! - The habit entity itself

use crate::{Error, Result};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Date format used for completion keys
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse a `YYYY-MM-DD` completion date
pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), DATE_FORMAT).map_err(|_| Error::MalformedDate(s.into()))
}

/// Format a date as a completion key
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

// ============================================================================
// Cadence
// ============================================================================

/// How often a habit is expected to be performed
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Cadence {
    #[default]
    Daily,
    Weekly,
}

impl FromStr for Cadence {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "daily" => Ok(Cadence::Daily),
            "weekly" => Ok(Cadence::Weekly),
            _ => Err(Error::UnknownCadence(s.into())),
        }
    }
}

impl fmt::Display for Cadence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cadence::Daily => f.pad("daily"),
            Cadence::Weekly => f.pad("weekly"),
        }
    }
}

// ============================================================================
// Completions and Streaks
// ============================================================================

/// Whether a habit was performed on (or for the week anchored at) a date
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct CompletionRecord {
    /// ISO-8601 `YYYY-MM-DD`
    pub date: String,
    #[serde(default = "default_completed")]
    pub completed: bool,
}

fn default_completed() -> bool {
    true
}

impl CompletionRecord {
    pub fn new(date: impl Into<String>, completed: bool) -> Self {
        Self {
            date: date.into(),
            completed,
        }
    }

    /// A completed record for a date
    pub fn done(date: NaiveDate) -> Self {
        Self::new(format_date(date), true)
    }
}

/// Derived streak counters for a habit
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct StreakResult {
    pub current_streak: u32,
    pub longest_streak: u32,
}

// ============================================================================
// Habit
// ============================================================================

/// A tracked habit with its completion history
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Habit {
    pub id: Uuid,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub cadence: Cadence,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub completions: Vec<CompletionRecord>,
    #[serde(default)]
    pub current_streak: u32,
    #[serde(default)]
    pub longest_streak: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields supplied when creating a habit
#[derive(Clone, Debug, Default)]
pub struct HabitDraft {
    pub title: String,
    pub description: Option<String>,
    pub cadence: Cadence,
    pub category: Option<String>,
}

/// Partial update of a habit's editable fields
#[derive(Clone, Debug, Default)]
pub struct HabitPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub cadence: Option<Cadence>,
    pub category: Option<String>,
}

impl HabitPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.cadence.is_none()
            && self.category.is_none()
    }
}
