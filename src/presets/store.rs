//! Durable storage for the preset collection
//!
//! The whole collection is one JSON document at a fixed location. Reads
//! never fail: a missing or corrupt document loads as an empty collection.
//! A corrupt document is copied aside first so the next save cannot lose it.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use super::collection::{PresetCollection, StoredCollection};
use crate::constants::storage::{APP_DIR, BACKUP_EXTENSION, FILENAME, TEMP_EXTENSION};
use crate::errors::PresetError;

pub trait PresetStore {
    /// Read the stored collection; absence and corruption both yield an empty one
    fn load(&self) -> PresetCollection;

    /// Replace the stored collection as a whole
    fn save(&self, collection: &PresetCollection) -> Result<(), PresetError>;
}

impl<S: PresetStore + ?Sized> PresetStore for &S {
    fn load(&self) -> PresetCollection {
        (**self).load()
    }

    fn save(&self, collection: &PresetCollection) -> Result<(), PresetError> {
        (**self).save(collection)
    }
}

/// Preset collection stored as pretty-printed JSON
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn at_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn default_path() -> PathBuf {
        let mut path = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        path.push(APP_DIR);
        path.push(FILENAME);
        path
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        self.path.with_extension(TEMP_EXTENSION)
    }

    pub fn backup_path(&self) -> PathBuf {
        self.path.with_extension(BACKUP_EXTENSION)
    }

    fn back_up_corrupt(&self) {
        let backup = self.backup_path();
        match fs::copy(&self.path, &backup) {
            Ok(_) => warn!(backup = %backup.display(), "Kept a copy of the corrupt preset store"),
            Err(err) => warn!(backup = %backup.display(), error = %err, "Failed to back up corrupt preset store"),
        }
    }
}

impl PresetStore for JsonFileStore {
    fn load(&self) -> PresetCollection {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!(path = %self.path.display(), "Preset store not found, starting empty");
                return PresetCollection::default();
            }
            Err(err) => {
                warn!(path = %self.path.display(), error = %err, "Failed to read preset store, starting empty");
                return PresetCollection::default();
            }
        };

        match decode(&contents) {
            Ok(collection) => {
                info!(path = %self.path.display(), presets = collection.len(), "Loaded preset store");
                collection
            }
            Err(err) => {
                warn!(path = %self.path.display(), error = %err, "Preset store is corrupt, starting empty");
                self.back_up_corrupt();
                PresetCollection::default()
            }
        }
    }

    fn save(&self, collection: &PresetCollection) -> Result<(), PresetError> {
        let json = serde_json::to_string_pretty(collection)?;

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|source| PresetError::Storage {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        // Write a sibling file then rename over the target so readers never see a torn document
        let tmp = self.temp_path();
        fs::write(&tmp, json).map_err(|source| PresetError::Storage {
            path: tmp.clone(),
            source,
        })?;
        if let Err(source) = fs::rename(&tmp, &self.path) {
            let _ = fs::remove_file(&tmp);
            return Err(PresetError::Storage {
                path: self.path.clone(),
                source,
            });
        }

        info!(path = %self.path.display(), presets = collection.len(), "Saved preset store");
        Ok(())
    }
}

fn decode(contents: &str) -> Result<PresetCollection, serde_json::Error> {
    serde_json::from_str::<StoredCollection>(contents).map(PresetCollection::from_stored)
}

/// In-memory store for tests; can start corrupt or refuse writes
#[cfg(test)]
#[derive(Debug, Default)]
pub struct MemoryStore {
    document: std::cell::RefCell<Option<String>>,
    fail_saves: std::cell::Cell<bool>,
    saves: std::cell::Cell<usize>,
}

#[cfg(test)]
impl MemoryStore {
    pub fn with_contents(contents: &str) -> Self {
        let store = Self::default();
        *store.document.borrow_mut() = Some(contents.to_string());
        store
    }

    pub fn set_fail_saves(&self, fail: bool) {
        self.fail_saves.set(fail);
    }

    pub fn contents(&self) -> Option<String> {
        self.document.borrow().clone()
    }

    pub fn save_count(&self) -> usize {
        self.saves.get()
    }
}

#[cfg(test)]
impl PresetStore for MemoryStore {
    fn load(&self) -> PresetCollection {
        self.document
            .borrow()
            .as_deref()
            .and_then(|contents| decode(contents).ok())
            .unwrap_or_default()
    }

    fn save(&self, collection: &PresetCollection) -> Result<(), PresetError> {
        if self.fail_saves.get() {
            return Err(PresetError::Storage {
                path: PathBuf::from("<memory>"),
                source: std::io::Error::other("simulated write failure"),
            });
        }
        let json = serde_json::to_string_pretty(collection)?;
        *self.document.borrow_mut() = Some(json);
        self.saves.set(self.saves.get() + 1);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::default_configuration;
    use crate::presets::collection::Preset;

    fn sample_collection() -> PresetCollection {
        let tuned = default_configuration()
            .with_field("minimum_mood", serde_json::json!(5))
            .unwrap();
        PresetCollection::new(
            vec![
                Preset::new("Preset 1", default_configuration().clone()),
                Preset::new("Long distance", tuned),
            ],
            1,
        )
    }

    #[test]
    fn test_missing_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::at_path(dir.path().join("presets.json"));
        assert!(store.load().is_empty());
    }

    #[test]
    fn test_corrupt_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("presets.json");
        fs::write(&path, "{ this is not json").unwrap();

        let store = JsonFileStore::at_path(&path);
        assert!(store.load().is_empty());
    }

    #[test]
    fn test_corrupt_file_is_backed_up_before_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("presets.json");
        let original = r#"{"presets": [{"name": "Mile", "config": {}},]}"#;
        fs::write(&path, original).unwrap();

        let store = JsonFileStore::at_path(&path);
        assert!(store.load().is_empty());
        store.save(&sample_collection()).unwrap();

        assert_eq!(fs::read_to_string(store.backup_path()).unwrap(), original);
        assert_eq!(store.load(), sample_collection());
    }

    #[test]
    fn test_valid_file_is_not_backed_up() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::at_path(dir.path().join("presets.json"));

        store.save(&sample_collection()).unwrap();
        store.load();
        assert!(!store.backup_path().exists());
    }

    #[test]
    fn test_bad_entry_does_not_discard_other_presets() {
        let store = MemoryStore::with_contents(
            r#"{"active_index": 0, "presets": [{"name": "Mile", "config": {"minimum_mood": 4}}, {"name": 3}, 7]}"#,
        );

        let collection = store.load();
        let names: Vec<&str> = collection.presets().iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Mile", "Preset 2", "Preset 3"]);

        store.save(&collection).unwrap();
        assert_eq!(store.load().presets()[0].name, "Mile");
        assert_eq!(store.load().presets()[0].config.get_i64("minimum_mood"), Some(4));
    }

    #[test]
    fn test_wrong_shape_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("presets.json");
        fs::write(&path, r#"{"presets": "nope"}"#).unwrap();

        assert!(JsonFileStore::at_path(&path).load().is_empty());
    }

    #[test]
    fn test_save_then_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::at_path(dir.path().join("nested/dir/presets.json"));
        let collection = sample_collection();

        store.save(&collection).unwrap();
        assert_eq!(store.load(), collection);
    }

    #[test]
    fn test_save_leaves_no_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::at_path(dir.path().join("presets.json"));

        store.save(&sample_collection()).unwrap();
        assert!(store.path().exists());
        assert!(!store.temp_path().exists());
    }

    #[test]
    fn test_save_replaces_previous_document() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::at_path(dir.path().join("presets.json"));

        store.save(&sample_collection()).unwrap();
        let single = PresetCollection::new(
            vec![Preset::new("Only", default_configuration().clone())],
            0,
        );
        store.save(&single).unwrap();

        assert_eq!(store.load(), single);
    }

    #[test]
    fn test_save_failure_reports_storage_error() {
        let dir = tempfile::tempdir().unwrap();
        // Parent "directory" is a regular file, so creating it fails
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "").unwrap();
        let store = JsonFileStore::at_path(blocker.join("presets.json"));

        let err = store.save(&sample_collection()).unwrap_err();
        assert!(matches!(err, PresetError::Storage { .. }));
    }

    #[test]
    fn test_memory_store_round_trip_and_failure() {
        let store = MemoryStore::default();
        assert!(store.load().is_empty());

        store.save(&sample_collection()).unwrap();
        assert_eq!(store.load(), sample_collection());
        assert_eq!(store.save_count(), 1);

        store.set_fail_saves(true);
        assert!(store.save(&PresetCollection::default()).is_err());
        assert_eq!(store.load(), sample_collection());
    }

    #[test]
    fn test_default_path_ends_with_app_file() {
        let path = JsonFileStore::default_path();
        assert!(path.ends_with(Path::new(APP_DIR).join(FILENAME)));
    }
}
