//! CSV export of completion history.

use crate::{Habit, Result};
use std::path::Path;

/// A row in the CSV output
#[derive(Debug, serde::Serialize)]
struct CsvRow<'a> {
    habit_id: String,
    title: &'a str,
    cadence: String,
    date: &'a str,
    completed: bool,
}

/// Write every completion record of every habit to a CSV file
///
/// Rows are sorted by habit title, then date. The file is replaced if it
/// exists and synced to disk before returning the number of rows written.
pub fn export_completions(habits: &[Habit], path: &Path) -> Result<usize> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let mut rows: Vec<CsvRow> = habits
        .iter()
        .flat_map(|habit| {
            habit.completions.iter().map(move |record| CsvRow {
                habit_id: habit.id.to_string(),
                title: &habit.title,
                cadence: habit.cadence.to_string(),
                date: &record.date,
                completed: record.completed,
            })
        })
        .collect();
    rows.sort_by(|a, b| a.title.cmp(b.title).then_with(|| a.date.cmp(b.date)));

    let file = std::fs::File::create(path)?;
    let mut writer = csv::WriterBuilder::new().has_headers(true).from_writer(file);

    for row in &rows {
        writer.serialize(row)?;
    }

    writer.flush()?;
    let file = writer
        .into_inner()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e.to_string()))?;
    file.sync_all()?;

    tracing::info!("Exported {} completion records to {:?}", rows.len(), path);
    Ok(rows.len())
}
