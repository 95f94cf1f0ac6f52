//! JSON-file record store.
//!
//! One pretty-printed JSON file per collection under a data directory.
//! Reads degrade to the collection's default on a missing or unreadable
//! file (seeding the file when it did not exist); write failures surface
//! as [`ApiError::Storage`].
//!
//! Mutations must hold the collection's guard across the whole
//! load-mutate-save cycle so concurrent requests cannot interleave a
//! read-modify-write. Plain reads do not need the guard.

use crate::error::ApiError;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::PathBuf;
use tokio::sync::{Mutex, MutexGuard};

/// A named, JSON-backed collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collection {
    Products,
    Orders,
    OrderSequence,
    Categories,
    Customers,
    Settings,
    Users,
    PendingUsers,
    Dashboard,
}

impl Collection {
    pub const ALL: [Collection; 9] = [
        Collection::Products,
        Collection::Orders,
        Collection::OrderSequence,
        Collection::Categories,
        Collection::Customers,
        Collection::Settings,
        Collection::Users,
        Collection::PendingUsers,
        Collection::Dashboard,
    ];

    pub fn file_name(self) -> &'static str {
        match self {
            Collection::Products => "products.json",
            Collection::Orders => "orders.json",
            Collection::OrderSequence => "order_seq.json",
            Collection::Categories => "categories.json",
            Collection::Customers => "customers.json",
            Collection::Settings => "settings.json",
            Collection::Users => "users.json",
            Collection::PendingUsers => "pending_users.json",
            Collection::Dashboard => "dashboard.json",
        }
    }
}

/// Store over one data directory, with a write lock per collection.
pub struct RecordStore {
    dir: PathBuf,
    locks: [Mutex<()>; Collection::ALL.len()],
}

impl RecordStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            locks: std::array::from_fn(|_| Mutex::new(())),
        }
    }

    fn path(&self, collection: Collection) -> PathBuf {
        self.dir.join(collection.file_name())
    }

    /// Acquire the single-writer guard for `collection`. Hold it for the
    /// entire load-mutate-save cycle of a mutation.
    pub async fn guard(&self, collection: Collection) -> MutexGuard<'_, ()> {
        self.locks[collection as usize].lock().await
    }

    /// Load a collection, seeding the file with the default value when it
    /// does not exist yet. Unreadable content degrades to the default.
    pub async fn read<T>(&self, collection: Collection) -> T
    where
        T: DeserializeOwned + Serialize + Default,
    {
        let path = self.path(collection);
        match tokio::fs::read(&path).await {
            Ok(bytes) => match serde_json::from_slice(&bytes) {
                Ok(value) => value,
                Err(err) => {
                    tracing::warn!(
                        collection = collection.file_name(),
                        %err,
                        "unreadable collection file, using default"
                    );
                    T::default()
                }
            },
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                let value = T::default();
                if let Err(err) = self.write(collection, &value).await {
                    tracing::warn!(collection = collection.file_name(), %err, "failed to seed collection file");
                }
                value
            }
            Err(err) => {
                tracing::warn!(collection = collection.file_name(), %err, "failed to read collection file, using default");
                T::default()
            }
        }
    }

    /// Overwrite the whole collection file, creating the data directory
    /// on first use.
    pub async fn write<T: Serialize>(&self, collection: Collection, value: &T) -> Result<(), ApiError> {
        let path = self.path(collection);
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| ApiError::Storage(format!("create {}: {e}", parent.display())))?;
        }
        let bytes = serde_json::to_vec_pretty(value)
            .map_err(|e| ApiError::Storage(format!("encode {}: {e}", collection.file_name())))?;
        tokio::fs::write(&path, bytes)
            .await
            .map_err(|e| ApiError::Storage(format!("write {}: {e}", collection.file_name())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
    struct Widget {
        id: String,
        count: u32,
    }

    fn store() -> (RecordStore, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        (RecordStore::new(dir.path()), dir)
    }

    #[tokio::test]
    async fn test_round_trip_deep_equal() {
        let (store, _dir) = store();
        let widgets = vec![
            Widget { id: "a".into(), count: 3 },
            Widget { id: "b".into(), count: 0 },
        ];
        store.write(Collection::Products, &widgets).await.unwrap();
        let loaded: Vec<Widget> = store.read(Collection::Products).await;
        assert_eq!(loaded, widgets);
    }

    #[tokio::test]
    async fn test_missing_file_seeds_default() {
        let (store, dir) = store();
        let loaded: Vec<Widget> = store.read(Collection::Categories).await;
        assert!(loaded.is_empty());
        // the default was written out
        let on_disk = std::fs::read_to_string(dir.path().join("categories.json")).unwrap();
        assert_eq!(on_disk.trim(), "[]");
    }

    #[tokio::test]
    async fn test_corrupt_file_degrades_to_default() {
        let (store, dir) = store();
        std::fs::write(dir.path().join("products.json"), "{ not json").unwrap();
        let loaded: Vec<Widget> = store.read(Collection::Products).await;
        assert!(loaded.is_empty());
    }

    #[tokio::test]
    async fn test_write_creates_data_dir() {
        let dir = tempfile::tempdir().unwrap();
        let store = RecordStore::new(dir.path().join("nested"));
        store.write(Collection::Orders, &vec![Widget::default()]).await.unwrap();
        assert!(dir.path().join("nested/orders.json").exists());
    }
}
