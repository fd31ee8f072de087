//! Error types for the habitual_core library.

use std::io;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for habitual_core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// TOML parsing error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Habit store error
    #[error("State error: {0}")]
    State(String),

    /// Habit field validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// A completion date that is not a `YYYY-MM-DD` calendar date
    #[error("Malformed date: {0:?} (expected YYYY-MM-DD)")]
    MalformedDate(String),

    /// A cadence other than daily or weekly
    #[error("Unknown cadence: {0:?} (expected daily or weekly)")]
    UnknownCadence(String),

    /// No habit matches the given id or prefix
    #[error("Habit not found: {0}")]
    HabitNotFound(String),

    /// More than one habit matches the given id prefix
    #[error("Ambiguous habit id {0:?}: matches more than one habit")]
    AmbiguousHabitId(String),
}
