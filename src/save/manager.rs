//! Save manager for item database files
//!
//! This module provides the SaveManager struct which handles:
//! - Writing a kind's records to `<kind>.json`
//! - Loading them back, with version and kind checks
//! - Keeping timestamped backups of the previous file and pruning old ones

use super::types::*;
use crate::item::{Item, ItemKind};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tracing::{debug, info};

pub struct SaveManager {
    save_directory: PathBuf,
    backup_count: usize,
}

impl SaveManager {
    /// Creates a new SaveManager with the given save directory
    ///
    /// The save directory will be created if it doesn't exist.
    pub fn new(save_directory: impl AsRef<Path>, backup_count: usize) -> Result<Self, SaveError> {
        let save_dir = save_directory.as_ref().to_path_buf();

        if !save_dir.exists() {
            fs::create_dir_all(&save_dir)?;
        }

        Ok(SaveManager {
            save_directory: save_dir,
            backup_count,
        })
    }

    /// Path of the live database file for a kind
    pub fn database_path(&self, kind: ItemKind) -> PathBuf {
        self.save_directory.join(format!("{}.json", kind.file_stem()))
    }

    /// Check if a database file exists for a kind
    pub fn database_exists(&self, kind: ItemKind) -> bool {
        self.database_path(kind).exists()
    }

    /// Writes all records of one kind, backing up the previous file first
    pub fn save_records<'a, R: Item + 'a>(
        &self,
        records: impl IntoIterator<Item = &'a R>,
    ) -> Result<PathBuf, SaveError> {
        let filepath = self.database_path(R::KIND);

        if filepath.exists() && self.backup_count > 0 {
            let backup = self.save_directory.join(Self::backup_filename(R::KIND));
            fs::copy(&filepath, &backup)?;
            debug!(backup = %backup.display(), "backed up database");
        }

        let file = DatabaseFile {
            version: CURRENT_DATABASE_VERSION,
            timestamp: SystemTime::now(),
            kind: R::KIND,
            records: records.into_iter().collect::<Vec<&R>>(),
        };

        // Pretty JSON so the file stays diffable
        let json = serde_json::to_string_pretty(&file)?;
        fs::write(&filepath, json)?;

        info!(kind = %R::KIND, count = file.records.len(), path = %filepath.display(), "database saved");

        self.cleanup_backups(R::KIND)?;
        Ok(filepath)
    }

    /// Loads all records of one kind
    ///
    /// A missing file is an empty database.
    pub fn load_records<R: Item>(&self) -> Result<Vec<R>, SaveError> {
        let filepath = self.database_path(R::KIND);

        if !filepath.exists() {
            debug!(path = %filepath.display(), "no database file yet");
            return Ok(Vec::new());
        }

        let json = fs::read_to_string(&filepath)?;
        let file: DatabaseFile<R> = serde_json::from_str(&json)?;

        // Version check
        if file.version > CURRENT_DATABASE_VERSION {
            return Err(SaveError::InvalidVersion(file.version));
        }
        if file.kind != R::KIND {
            return Err(SaveError::KindMismatch {
                expected: R::KIND,
                found: file.kind,
            });
        }

        Ok(file.records)
    }

    /// Backups of a kind's database, newest first
    pub fn list_backups(&self, kind: ItemKind) -> Result<Vec<PathBuf>, SaveError> {
        let prefix = format!("{}_backup_", kind.file_stem());

        let mut backups: Vec<PathBuf> = fs::read_dir(&self.save_directory)?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| {
                path.file_name()
                    .and_then(|f| f.to_str())
                    .map(|name| name.starts_with(&prefix) && name.ends_with(".json"))
                    .unwrap_or(false)
            })
            .collect();

        // Timestamped names sort chronologically
        backups.sort();
        backups.reverse();

        Ok(backups)
    }

    /// Delete old backups, keeping only the N most recent for a kind
    pub fn cleanup_backups(&self, kind: ItemKind) -> Result<(), SaveError> {
        for path in self.list_backups(kind)?.iter().skip(self.backup_count) {
            fs::remove_file(path)?;
        }
        Ok(())
    }

    fn backup_filename(kind: ItemKind) -> String {
        let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S%.3f");
        format!("{}_backup_{}.json", kind.file_stem(), timestamp)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::{ArmorRecord, ArmorType, WeaponRecord};

    #[test]
    fn test_missing_database_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let manager = SaveManager::new(dir.path(), 3).unwrap();

        let records: Vec<WeaponRecord> = manager.load_records().unwrap();
        assert!(records.is_empty());
        assert!(!manager.database_exists(ItemKind::Weapon));
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let manager = SaveManager::new(dir.path().join("nested"), 3).unwrap();

        let mut helm = ArmorRecord::named("Iron Helm");
        helm.armor_type = ArmorType::HEAD | ArmorType::SHIELD;
        helm.base.description = "Dented, but, still shiny".to_string();

        let path = manager.save_records(&[helm.clone()]).unwrap();
        assert_eq!(path, manager.database_path(ItemKind::Armor));

        let loaded: Vec<ArmorRecord> = manager.load_records().unwrap();
        assert_eq!(loaded, vec![helm]);
    }

    #[test]
    fn test_overwrite_keeps_backups() {
        let dir = tempfile::tempdir().unwrap();
        let manager = SaveManager::new(dir.path(), 2).unwrap();

        for round in 0..4 {
            let sword = WeaponRecord::named(format!("Sword {round}"));
            manager.save_records(&[sword]).unwrap();
            std::thread::sleep(std::time::Duration::from_millis(5));
        }

        let backups = manager.list_backups(ItemKind::Weapon).unwrap();
        assert_eq!(backups.len(), 2);

        let loaded: Vec<WeaponRecord> = manager.load_records().unwrap();
        assert_eq!(loaded[0].base.name, "Sword 3");
    }

    #[test]
    fn test_kind_mismatch_is_refused() {
        let dir = tempfile::tempdir().unwrap();
        let manager = SaveManager::new(dir.path(), 0).unwrap();
        manager.save_records(&[WeaponRecord::named("Sword")]).unwrap();

        // Put the weapon file where the armor file belongs
        fs::copy(
            manager.database_path(ItemKind::Weapon),
            manager.database_path(ItemKind::Armor),
        )
        .unwrap();

        let result: Result<Vec<ArmorRecord>, _> = manager.load_records();
        assert!(matches!(
            result,
            Err(SaveError::KindMismatch { expected: ItemKind::Armor, found: ItemKind::Weapon })
        ));
    }

    #[test]
    fn test_newer_version_is_refused() {
        let dir = tempfile::tempdir().unwrap();
        let manager = SaveManager::new(dir.path(), 0).unwrap();
        let json = r#"{"version":99,"timestamp":{"secs_since_epoch":0,"nanos_since_epoch":0},"kind":"Potion","records":[]}"#;
        fs::write(manager.database_path(ItemKind::Potion), json).unwrap();

        let result: Result<Vec<crate::item::PotionRecord>, _> = manager.load_records();
        assert!(matches!(result, Err(SaveError::InvalidVersion(99))));
    }
}
