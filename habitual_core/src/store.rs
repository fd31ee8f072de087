//! Habit store persistence with file locking.
//!
//! All habits live in a single JSON file. Reads take a shared lock, writes go
//! through a temp file that is renamed over the original, and
//! [`HabitStore::update`] serializes whole load-modify-save cycles with an
//! exclusive lock on a sidecar `.lock` file.

use crate::{Error, Habit, Result};
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use std::fs::{File, OpenOptions};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Every habit the user tracks
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct HabitStore {
    #[serde(default)]
    pub habits: Vec<Habit>,
}

impl HabitStore {
    /// Load the store from a file with shared locking
    ///
    /// Returns an empty store if the file doesn't exist. If the file is
    /// corrupted it is moved aside to `<name>.corrupt`, a warning is logged,
    /// and an empty store is returned.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::info!("No habit store found at {:?}, starting empty", path);
            return Ok(Self::default());
        }

        let file = File::open(path)?;
        file.lock_shared()?;

        let mut contents = String::new();
        let read = std::io::BufReader::new(&file).read_to_string(&mut contents);
        file.unlock()?;
        drop(file);
        read?;

        match serde_json::from_str::<HabitStore>(&contents) {
            Ok(store) => {
                tracing::debug!("Loaded {} habits from {:?}", store.habits.len(), path);
                Ok(store)
            }
            Err(e) => {
                let backup = corrupt_path(path);
                tracing::warn!(
                    "Failed to parse habit store {:?}: {}. Moved to {:?}, starting empty.",
                    path,
                    e,
                    backup
                );
                std::fs::rename(path, &backup)?;
                Ok(Self::default())
            }
        }
    }

    /// Save the store to a file
    ///
    /// Atomically writes by:
    /// 1. Writing to a temp file in the same directory
    /// 2. Syncing to disk
    /// 3. Renaming over the original
    pub fn save(&self, path: &Path) -> Result<()> {
        let parent = path
            .parent()
            .ok_or_else(|| Error::State(format!("store path {:?} has no parent", path)))?;
        std::fs::create_dir_all(parent)?;

        let temp = NamedTempFile::new_in(parent)?;
        temp.as_file().lock_exclusive()?;

        {
            let mut writer = std::io::BufWriter::new(temp.as_file());
            let contents = serde_json::to_string_pretty(self)?;
            writer.write_all(contents.as_bytes())?;
            writer.flush()?;
        }

        temp.as_file().sync_all()?;
        temp.as_file().unlock()?;

        temp.persist(path).map_err(|e| Error::Io(e.error))?;

        tracing::debug!("Saved {} habits to {:?}", self.habits.len(), path);
        Ok(())
    }

    /// Load the store, modify it, and save it back
    ///
    /// The whole cycle holds an exclusive lock on `<name>.lock`, so two
    /// processes toggling completions cannot lose each other's writes. The
    /// store is only saved if `f` succeeds.
    pub fn update<F, T>(path: &Path, f: F) -> Result<T>
    where
        F: FnOnce(&mut HabitStore) -> Result<T>,
    {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let lock = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(lock_path(path))?;
        lock.lock_exclusive()?;

        let result = Self::load(path).and_then(|mut store| {
            let value = f(&mut store)?;
            store.save(path)?;
            Ok(value)
        });

        lock.unlock()?;
        result
    }

    pub fn insert(&mut self, habit: Habit) {
        self.habits.push(habit);
    }

    /// Look up a habit by full id or unique id prefix
    pub fn get(&self, key: &str) -> Result<&Habit> {
        let index = self.find_index(key)?;
        Ok(&self.habits[index])
    }

    pub fn get_mut(&mut self, key: &str) -> Result<&mut Habit> {
        let index = self.find_index(key)?;
        Ok(&mut self.habits[index])
    }

    pub fn remove(&mut self, key: &str) -> Result<Habit> {
        let index = self.find_index(key)?;
        Ok(self.habits.remove(index))
    }

    fn find_index(&self, key: &str) -> Result<usize> {
        let key = key.trim().to_lowercase();
        if key.is_empty() {
            return Err(Error::HabitNotFound(key));
        }

        let mut matches = self
            .habits
            .iter()
            .enumerate()
            .filter(|(_, h)| h.id.to_string().starts_with(&key))
            .map(|(i, _)| i);

        match (matches.next(), matches.next()) {
            (Some(index), None) => Ok(index),
            (Some(_), Some(_)) => Err(Error::AmbiguousHabitId(key)),
            (None, _) => Err(Error::HabitNotFound(key)),
        }
    }
}

fn lock_path(path: &Path) -> PathBuf {
    sibling_with_suffix(path, "lock")
}

fn corrupt_path(path: &Path) -> PathBuf {
    sibling_with_suffix(path, "corrupt")
}

fn sibling_with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".");
    name.push(suffix);
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{HabitDraft, StreakResult};
    use chrono::{NaiveDate, Utc};

    fn habit(title: &str) -> Habit {
        Habit::new(
            HabitDraft {
                title: title.into(),
                ..Default::default()
            },
            Utc::now(),
        )
        .unwrap()
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("habits.json");

        let mut h = habit("Floss");
        let today = NaiveDate::from_ymd_opt(2024, 6, 12).unwrap();
        h.mark_completion("2024-06-12", true, today, Utc::now()).unwrap();

        let mut store = HabitStore::default();
        store.insert(h.clone());
        store.save(&path).unwrap();

        let loaded = HabitStore::load(&path).unwrap();
        assert_eq!(loaded.habits.len(), 1);
        assert_eq!(loaded.habits[0].id, h.id);
        assert_eq!(
            loaded.habits[0].streaks(),
            StreakResult {
                current_streak: 1,
                longest_streak: 1
            }
        );
    }

    #[test]
    fn test_load_nonexistent_returns_empty() {
        let temp_dir = tempfile::tempdir().unwrap();
        let store = HabitStore::load(&temp_dir.path().join("missing.json")).unwrap();
        assert!(store.habits.is_empty());
    }

    #[test]
    fn test_corrupted_store_is_moved_aside() {
        crate::logging::init_test();
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("habits.json");
        std::fs::write(&path, "{ invalid json }").unwrap();

        let store = HabitStore::load(&path).unwrap();
        assert!(store.habits.is_empty());
        assert!(!path.exists());

        let backup = temp_dir.path().join("habits.json.corrupt");
        assert_eq!(std::fs::read_to_string(backup).unwrap(), "{ invalid json }");
    }

    #[test]
    fn test_update_persists_on_success() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("habits.json");

        let id = HabitStore::update(&path, |store| {
            let h = habit("Read");
            let id = h.id;
            store.insert(h);
            Ok(id)
        })
        .unwrap();

        let loaded = HabitStore::load(&path).unwrap();
        assert_eq!(loaded.habits.len(), 1);
        assert_eq!(loaded.habits[0].id, id);
    }

    #[test]
    fn test_update_discards_on_error() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("habits.json");

        let result: Result<()> = HabitStore::update(&path, |store| {
            store.insert(habit("Read"));
            Err(Error::Validation("nope".into()))
        });
        assert!(result.is_err());
        assert!(HabitStore::load(&path).unwrap().habits.is_empty());
    }

    #[test]
    fn test_atomic_save_leaves_no_temp_files() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("habits.json");

        HabitStore::default().save(&path).unwrap();

        let extras: Vec<_> = std::fs::read_dir(temp_dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name() != "habits.json")
            .collect();
        assert!(
            extras.is_empty(),
            "Expected only habits.json, found extras: {:?}",
            extras
        );
    }

    #[test]
    fn test_lookup_by_prefix() {
        let mut store = HabitStore::default();
        let a = habit("A");
        let b = habit("B");
        store.insert(a.clone());
        store.insert(b.clone());

        let full = a.id.to_string();
        assert_eq!(store.get(&full).unwrap().title, "A");
        assert_eq!(store.get(&full[..8].to_uppercase()).unwrap().title, "A");
        assert!(matches!(store.get(""), Err(Error::HabitNotFound(_))));
        assert!(matches!(
            store.get("not-a-real-id"),
            Err(Error::HabitNotFound(_))
        ));

        let removed = store.remove(&b.id.to_string()).unwrap();
        assert_eq!(removed.title, "B");
        assert_eq!(store.habits.len(), 1);
    }

    #[test]
    fn test_ambiguous_prefix() {
        let mut store = HabitStore::default();
        let a = habit("A");
        let mut b = habit("B");
        // Force a shared prefix
        let mut bytes = *b.id.as_bytes();
        bytes[..4].copy_from_slice(&a.id.as_bytes()[..4]);
        b.id = uuid::Uuid::from_bytes(bytes);
        store.insert(a.clone());
        store.insert(b);

        let prefix = &a.id.to_string()[..8];
        assert!(matches!(
            store.get(prefix),
            Err(Error::AmbiguousHabitId(_))
        ));
    }
}
