//! Append-only journal of completion toggles.
//!
//! Every mark/unmark is appended to a JSONL (JSON Lines) file with file
//! locking so that concurrent invocations never interleave partial lines.

use crate::Result;
use chrono::{DateTime, Utc};
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// One mark or unmark of a habit for a date
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct CompletionEvent {
    pub habit_id: Uuid,
    pub date: String,
    pub completed: bool,
    pub recorded_at: DateTime<Utc>,
}

/// Journal sink trait for persisting completion events
pub trait JournalSink {
    fn append(&mut self, event: &CompletionEvent) -> Result<()>;
}

/// JSONL-based journal with file locking
pub struct JsonlJournal {
    path: PathBuf,
}

impl JsonlJournal {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn ensure_parent_dir(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        Ok(())
    }
}

impl JournalSink for JsonlJournal {
    fn append(&mut self, event: &CompletionEvent) -> Result<()> {
        self.ensure_parent_dir()?;

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;

        file.lock_exclusive()?;

        let mut writer = std::io::BufWriter::new(&file);
        let line = serde_json::to_string(event)?;
        writer.write_all(line.as_bytes())?;
        writer.write_all(b"\n")?;
        writer.flush()?;
        drop(writer);

        file.unlock()?;

        tracing::debug!(
            "Journaled {} {} for habit {}",
            if event.completed { "mark" } else { "unmark" },
            event.date,
            event.habit_id
        );
        Ok(())
    }
}

/// Read all events from a journal file, oldest first
///
/// Lines that fail to parse are logged and skipped.
pub fn read_events(path: &Path) -> Result<Vec<CompletionEvent>> {
    if !path.exists() {
        return Ok(Vec::new());
    }

    let file = File::open(path)?;
    file.lock_shared()?;

    let reader = BufReader::new(&file);
    let mut events = Vec::new();

    for (line_num, line_result) in reader.lines().enumerate() {
        let line = line_result?;
        if line.trim().is_empty() {
            continue;
        }

        match serde_json::from_str::<CompletionEvent>(&line) {
            Ok(event) => events.push(event),
            Err(e) => {
                tracing::warn!(
                    "Failed to parse journal event at line {}: {}",
                    line_num + 1,
                    e
                );
            }
        }
    }

    file.unlock()?;
    tracing::debug!("Read {} events from journal", events.len());
    Ok(events)
}

/// The most recent `limit` events, newest first
pub fn recent_events(path: &Path, limit: usize) -> Result<Vec<CompletionEvent>> {
    let mut events = read_events(path)?;
    events.reverse();
    events.truncate(limit);
    Ok(events)
}
