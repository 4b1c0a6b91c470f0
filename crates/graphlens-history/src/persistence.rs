/// Session-scoped key-value storage for history snapshots.
///
/// A snapshot is the JSON rendering of a `HistoryState`, stored as a plain
/// string under a fixed key. Two stores are provided:
/// - `RedbSessionStorage`: one redb file with a single `&str -> &str` table,
///   wiped when opened so its contents only live for one session
/// - `MemorySessionStorage`: a mutex-guarded map, for tests and embedders
///   that do not want a file
use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use redb::{Database, ReadableDatabase, ReadableTable, TableDefinition};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::state::HistoryState;

/// Session table: key → raw string value.
const SESSION_TABLE: TableDefinition<&str, &str> = TableDefinition::new("session");

/// Minimal string store with the shape of a browser session store.
pub trait SessionStorage: Send + Sync {
    /// Stores `value` under `key`, replacing any previous value.
    fn set_item(&self, key: &str, value: &str) -> Result<()>;

    /// Reads the value under `key`, or `None` if absent.
    fn get_item(&self, key: &str) -> Result<Option<String>>;

    /// Removes `key`. Removing an absent key is not an error.
    fn remove_item(&self, key: &str) -> Result<()>;

    /// Removes every key.
    fn clear(&self) -> Result<()>;
}

/// Serializes `state` to JSON and stores it under `key`.
///
/// # Errors
///
/// Returns an error if serialization or the storage write fails.
pub fn save_snapshot<F: Serialize>(
    storage: &dyn SessionStorage,
    key: &str,
    state: &HistoryState<F>,
) -> Result<()> {
    let json = serde_json::to_string(state).context("Failed to serialize filter history")?;
    storage
        .set_item(key, &json)
        .with_context(|| format!("Failed to store filter history under '{key}'"))
}

/// Reads and parses the snapshot stored under `key`.
///
/// Returns `None` when nothing is stored.
///
/// # Errors
///
/// Returns an error if the storage read fails or the stored string is not a
/// valid snapshot.
pub fn load_snapshot<F: DeserializeOwned>(
    storage: &dyn SessionStorage,
    key: &str,
) -> Result<Option<HistoryState<F>>> {
    let Some(json) = storage
        .get_item(key)
        .with_context(|| format!("Failed to read filter history under '{key}'"))?
    else {
        return Ok(None);
    };
    let state = serde_json::from_str(&json)
        .with_context(|| format!("Failed to parse filter history under '{key}'"))?;
    Ok(Some(state))
}

/// Session storage backed by redb.
pub struct RedbSessionStorage {
    db: Database,
}

impl std::fmt::Debug for RedbSessionStorage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedbSessionStorage").finish()
    }
}

impl RedbSessionStorage {
    /// Opens or creates `session.redb` in `data_dir` and clears it.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created or the database
    /// cannot be opened or cleared.
    pub fn open_session(data_dir: &Path) -> Result<Arc<Self>> {
        let storage = Self::open(data_dir)?;
        storage.clear().context("Failed to clear previous session")?;
        Ok(storage)
    }

    /// Opens or creates `session.redb` in `data_dir`, keeping its contents.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created or the database
    /// cannot be opened.
    pub fn open(data_dir: &Path) -> Result<Arc<Self>> {
        std::fs::create_dir_all(data_dir)
            .with_context(|| format!("Failed to create data directory: {}", data_dir.display()))?;

        let db_path = data_dir.join("session.redb");
        let db = Database::create(&db_path)
            .with_context(|| format!("Failed to open session database: {}", db_path.display()))?;

        // Ensure the table exists
        let write_txn = db
            .begin_write()
            .context("Failed to begin initial write transaction")?;
        {
            let _ = write_txn
                .open_table(SESSION_TABLE)
                .context("Failed to create session table")?;
        }
        write_txn
            .commit()
            .context("Failed to commit initial transaction")?;

        Ok(Arc::new(Self { db }))
    }

    /// Lists every stored key.
    ///
    /// # Errors
    ///
    /// Returns an error if the read transaction fails.
    pub fn keys(&self) -> Result<Vec<String>> {
        let read_txn = self
            .db
            .begin_read()
            .context("Failed to begin read transaction")?;
        let table = read_txn
            .open_table(SESSION_TABLE)
            .context("Failed to open session table")?;

        let mut keys = Vec::new();
        for entry in table.iter().context("Failed to iterate session table")? {
            let (key_guard, _) = entry.context("Failed to read session entry")?;
            keys.push(key_guard.value().to_string());
        }
        Ok(keys)
    }
}

impl SessionStorage for RedbSessionStorage {
    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        let write_txn = self
            .db
            .begin_write()
            .context("Failed to begin write transaction")?;
        {
            let mut table = write_txn
                .open_table(SESSION_TABLE)
                .context("Failed to open session table")?;
            table
                .insert(key, value)
                .context("Failed to insert session item")?;
        }
        write_txn
            .commit()
            .context("Failed to commit session item")?;
        Ok(())
    }

    fn get_item(&self, key: &str) -> Result<Option<String>> {
        let read_txn = self
            .db
            .begin_read()
            .context("Failed to begin read transaction")?;
        let table = read_txn
            .open_table(SESSION_TABLE)
            .context("Failed to open session table")?;

        match table.get(key).context("Failed to read session item")? {
            Some(guard) => Ok(Some(guard.value().to_string())),
            None => Ok(None),
        }
    }

    fn remove_item(&self, key: &str) -> Result<()> {
        let write_txn = self
            .db
            .begin_write()
            .context("Failed to begin write transaction")?;
        {
            let mut table = write_txn
                .open_table(SESSION_TABLE)
                .context("Failed to open session table")?;
            let _ = table.remove(key).context("Failed to remove session item")?;
        }
        write_txn
            .commit()
            .context("Failed to commit session item removal")?;
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        let write_txn = self
            .db
            .begin_write()
            .context("Failed to begin write transaction")?;
        {
            let mut table = write_txn
                .open_table(SESSION_TABLE)
                .context("Failed to open session table")?;

            let keys = table
                .iter()
                .context("Failed to iterate session table")?
                .map(|entry| entry.map(|(k, _)| k.value().to_string()))
                .collect::<Result<Vec<_>, _>>()
                .context("Failed to read session keys")?;

            for key in &keys {
                table
                    .remove(key.as_str())
                    .context("Failed to remove session item")?;
            }
        }
        write_txn
            .commit()
            .context("Failed to commit session clear")?;
        Ok(())
    }
}

/// In-memory session storage.
#[derive(Debug, Default)]
pub struct MemorySessionStorage {
    items: Mutex<HashMap<String, String>>,
}

impl MemorySessionStorage {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    fn items(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, String>>> {
        self.items
            .lock()
            .map_err(|_| anyhow::anyhow!("session storage lock poisoned"))
    }
}

impl SessionStorage for MemorySessionStorage {
    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        self.items()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn get_item(&self, key: &str) -> Result<Option<String>> {
        Ok(self.items()?.get(key).cloned())
    }

    fn remove_item(&self, key: &str) -> Result<()> {
        self.items()?.remove(key);
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        self.items()?.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn open_test_db() -> (Arc<RedbSessionStorage>, TempDir) {
        let dir = TempDir::new().expect("create temp dir");
        let storage = RedbSessionStorage::open_session(dir.path()).expect("open db");
        (storage, dir)
    }

    #[test]
    fn test_open_creates_empty_database() {
        let (storage, dir) = open_test_db();
        assert!(storage.keys().expect("keys").is_empty());
        assert!(dir.path().join("session.redb").exists());
    }

    #[test]
    fn test_set_and_get_item() {
        let (storage, _dir) = open_test_db();
        storage.set_item("filters", "{}").expect("set");
        assert_eq!(
            storage.get_item("filters").expect("get").as_deref(),
            Some("{}")
        );
        assert!(storage.get_item("missing").expect("get").is_none());
    }

    #[test]
    fn test_set_item_overwrites() {
        let (storage, _dir) = open_test_db();
        storage.set_item("k", "original").expect("set");
        storage.set_item("k", "updated").expect("overwrite");
        assert_eq!(storage.get_item("k").expect("get").as_deref(), Some("updated"));
        assert_eq!(storage.keys().expect("keys"), vec!["k"]);
    }

    #[test]
    fn test_remove_item() {
        let (storage, _dir) = open_test_db();
        storage.set_item("k", "v").expect("set");
        storage.remove_item("k").expect("remove");
        storage.remove_item("k").expect("remove absent");
        assert!(storage.get_item("k").expect("get").is_none());
    }

    #[test]
    fn test_clear_removes_everything() {
        let (storage, _dir) = open_test_db();
        for key in ["a", "b", "c"] {
            storage.set_item(key, key).expect("set");
        }
        storage.clear().expect("clear");
        assert!(storage.keys().expect("keys").is_empty());
    }

    #[test]
    fn test_clear_reads_every_key_before_removing() {
        let (storage, _dir) = open_test_db();
        for i in 0..50 {
            storage.set_item(&format!("filters-{i}"), "{}").expect("set");
        }
        assert_eq!(storage.keys().expect("keys").len(), 50);

        storage.clear().expect("clear");
        assert!(storage.keys().expect("keys").is_empty());
        assert!(storage.get_item("filters-49").expect("get").is_none());
    }

    #[test]
    fn test_open_keeps_data_but_open_session_clears_it() {
        let dir = TempDir::new().expect("create temp dir");
        {
            let storage = RedbSessionStorage::open(dir.path()).expect("open");
            storage.set_item("filters", "kept").expect("set");
        }
        {
            let storage = RedbSessionStorage::open(dir.path()).expect("reopen");
            assert_eq!(
                storage.get_item("filters").expect("get").as_deref(),
                Some("kept")
            );
        }
        {
            let storage = RedbSessionStorage::open_session(dir.path()).expect("new session");
            assert!(storage.get_item("filters").expect("get").is_none());
        }
    }

    #[test]
    fn test_memory_storage_basic() {
        let storage = MemorySessionStorage::new();
        storage.set_item("a", "1").expect("set");
        storage.set_item("b", "2").expect("set");
        storage.remove_item("a").expect("remove");
        assert!(storage.get_item("a").expect("get").is_none());
        assert_eq!(storage.get_item("b").expect("get").as_deref(), Some("2"));
        storage.clear().expect("clear");
        assert!(storage.get_item("b").expect("get").is_none());
    }

    #[test]
    fn test_snapshot_save_and_load() {
        let storage = MemorySessionStorage::new();
        let state = HistoryState::from_parts(vec![1u32, 2], vec![3]);
        save_snapshot(storage.as_ref(), "filters", &state).expect("save");

        assert_eq!(
            storage.get_item("filters").expect("get").as_deref(),
            Some(r#"{"past":[1,2],"future":[3]}"#)
        );
        let loaded: HistoryState<u32> = load_snapshot(storage.as_ref(), "filters")
            .expect("load")
            .expect("present");
        assert_eq!(loaded, state);
    }

    #[test]
    fn test_load_snapshot_missing_and_garbage() {
        let storage = MemorySessionStorage::new();
        let missing: Option<HistoryState<u32>> =
            load_snapshot(storage.as_ref(), "filters").expect("load");
        assert!(missing.is_none());

        storage.set_item("filters", "not json").expect("set");
        let garbage = load_snapshot::<u32>(storage.as_ref(), "filters");
        assert!(garbage.is_err());
    }
}
