//! Source of "today".
//!
//! Streaks are computed against a calendar date with no time of day. The
//! date is read once per command and passed down explicitly.

use chrono::{Local, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Which wall clock decides the current calendar date
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TimezonePolicy {
    /// Host-local wall clock
    #[default]
    Local,
    Utc,
}

/// The current calendar date under the given policy
pub fn today(policy: TimezonePolicy) -> NaiveDate {
    match policy {
        TimezonePolicy::Local => Local::now().date_naive(),
        TimezonePolicy::Utc => Utc::now().date_naive(),
    }
}
