//! Persistence providers used by the database controller
//!
//! The controller never touches files itself. After every committed change
//! it marks the touched record dirty, asks the provider to save, then to
//! refresh.

use std::collections::BTreeSet;
use std::marker::PhantomData;
use std::path::Path;
use tracing::{debug, info};
use super::manager::SaveManager;
use super::types::SaveError;
use crate::database::{ItemRepository, RecordId};
use crate::item::Item;

/// Durable storage for one repository
pub trait Persistence<R> {
    /// Notes that a record changed and must be written on the next save
    fn mark_dirty(&mut self, id: RecordId);

    /// Commits pending changes
    fn save(&mut self, repo: &ItemRepository<R>) -> Result<(), SaveError>;

    /// Re-reads storage after a save so external views are current
    fn refresh(&mut self) -> Result<(), SaveError>;
}

/// Keeps nothing; records what it was asked to do
///
/// Useful for hosts that own storage themselves, and for tests.
#[derive(Debug, Default)]
pub struct MemoryPersistence {
    pub dirty: BTreeSet<RecordId>,
    pub save_count: usize,
    pub refresh_count: usize,
}

impl<R: Item> Persistence<R> for MemoryPersistence {
    fn mark_dirty(&mut self, id: RecordId) {
        self.dirty.insert(id);
    }

    fn save(&mut self, _repo: &ItemRepository<R>) -> Result<(), SaveError> {
        self.save_count += 1;
        Ok(())
    }

    fn refresh(&mut self) -> Result<(), SaveError> {
        self.refresh_count += 1;
        Ok(())
    }
}

/// Stores a repository as a JSON file through a SaveManager
pub struct JsonPersistence<R> {
    manager: SaveManager,
    dirty: BTreeSet<RecordId>,
    /// Record count of the last save, checked on refresh
    saved_count: Option<usize>,
    _kind: PhantomData<R>,
}

impl<R: Item> JsonPersistence<R> {
    pub fn new(manager: SaveManager) -> Self {
        JsonPersistence {
            manager,
            dirty: BTreeSet::new(),
            saved_count: None,
            _kind: PhantomData,
        }
    }

    /// Opens the database directory and loads this kind's records
    pub fn open(directory: impl AsRef<Path>, backup_count: usize) -> Result<(Self, ItemRepository<R>), SaveError> {
        let manager = SaveManager::new(directory, backup_count)?;
        let records = manager.load_records::<R>()?;
        info!(kind = %R::KIND, count = records.len(), "database loaded");

        Ok((Self::new(manager), ItemRepository::from_records(records)))
    }

    /// Records changed since the last save
    pub fn dirty(&self) -> &BTreeSet<RecordId> {
        &self.dirty
    }
}

impl<R: Item> Persistence<R> for JsonPersistence<R> {
    fn mark_dirty(&mut self, id: RecordId) {
        self.dirty.insert(id);
    }

    fn save(&mut self, repo: &ItemRepository<R>) -> Result<(), SaveError> {
        debug!(kind = %R::KIND, dirty = self.dirty.len(), "saving database");
        // The file holds the whole kind, so it is rewritten even when only
        // deletions happened
        self.manager.save_records(repo.records())?;
        self.dirty.clear();
        self.saved_count = Some(repo.len());
        Ok(())
    }

    /// Reloads the file and checks it still holds what was last saved
    fn refresh(&mut self) -> Result<(), SaveError> {
        let found = self.manager.load_records::<R>()?.len();
        debug!(kind = %R::KIND, count = found, "database refreshed");

        match self.saved_count {
            Some(expected) if expected != found => Err(SaveError::StaleFile { expected, found }),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::PotionRecord;

    #[test]
    fn test_json_persistence_saves_and_reopens() {
        let dir = tempfile::tempdir().unwrap();
        let (mut store, mut repo) = JsonPersistence::<PotionRecord>::open(dir.path(), 1).unwrap();
        assert!(repo.is_empty());

        let id = repo.add(PotionRecord::named("Elixir")).unwrap();
        store.mark_dirty(id);
        assert_eq!(store.dirty().len(), 1);

        store.save(&repo).unwrap();
        store.refresh().unwrap();
        assert!(store.dirty().is_empty());

        let (_, reopened) = JsonPersistence::<PotionRecord>::open(dir.path(), 1).unwrap();
        assert_eq!(reopened.records().cloned().collect::<Vec<_>>(), vec![PotionRecord::named("Elixir")]);
    }

    #[test]
    fn test_refresh_detects_file_changed_behind_our_back() {
        let dir = tempfile::tempdir().unwrap();
        let (mut store, mut repo) = JsonPersistence::<PotionRecord>::open(dir.path(), 0).unwrap();
        repo.add(PotionRecord::named("Elixir")).unwrap();
        repo.add(PotionRecord::named("Tonic")).unwrap();
        store.save(&repo).unwrap();

        SaveManager::new(dir.path(), 0)
            .unwrap()
            .save_records(&[PotionRecord::named("Elixir")])
            .unwrap();

        assert!(matches!(
            store.refresh(),
            Err(SaveError::StaleFile { expected: 2, found: 1 })
        ));
    }

    #[test]
    fn test_memory_persistence_counts_calls() {
        let mut repo = ItemRepository::new();
        let id = repo.add(PotionRecord::named("Elixir")).unwrap();

        let mut store = MemoryPersistence::default();
        Persistence::<PotionRecord>::mark_dirty(&mut store, id);
        store.save(&repo).unwrap();
        Persistence::<PotionRecord>::refresh(&mut store).unwrap();

        assert!(store.dirty.contains(&id));
        assert_eq!(store.save_count, 1);
        assert_eq!(store.refresh_count, 1);
    }
}
