#![forbid(unsafe_code)]

//! Core domain model and business logic for Habitual.
//!
//! This crate provides:
//! - Domain types (habits, cadences, completion records)
//! - Streak engine and ISO week helper
//! - Habit lifecycle (validation, completion toggles)
//! - Persistence (habit store, completion journal, CSV export)
//! - Dashboard statistics

pub mod types;
pub mod error;
pub mod week;
pub mod streak;
pub mod habit;
pub mod clock;
pub mod config;
pub mod logging;
pub mod store;
pub mod journal;
pub mod stats;
pub mod export;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use week::WeekId;
pub use streak::compute_streaks;
pub use clock::TimezonePolicy;
pub use config::Config;
pub use store::HabitStore;
pub use journal::{CompletionEvent, JournalSink, JsonlJournal};
pub use stats::{summarize, HabitStats};
pub use export::export_completions;
