use std::{
    fmt,
    path::{Path, PathBuf},
    sync::Arc,
};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::{fs::OpenOptions, io::AsyncWriteExt};
use uuid::Uuid;

use crate::{error::StoreError, model::EntityKind};

/// Durable identifier assigned by the store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(pub String);

impl RecordId {
    /// Fresh random identifier.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Row as written by the bundled stores.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredRecord {
    /// Assigned id.
    pub id: RecordId,
    /// Destination table.
    pub table: String,
    /// Insert time.
    pub inserted_at: DateTime<Utc>,
    /// Request payload.
    pub payload: Value,
}

impl StoredRecord {
    fn new(kind: EntityKind, payload: Value) -> Self {
        Self {
            id: RecordId::generate(),
            table: kind.table().to_string(),
            inserted_at: Utc::now(),
            payload,
        }
    }
}

/// Persistence collaborator: insert by entity kind, get an id back.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Inserts `payload` into the collection for `kind`.
    async fn insert(&self, kind: EntityKind, payload: Value) -> Result<RecordId, StoreError>;
}

/// Store kept in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryRecordStore {
    rows: Arc<Mutex<Vec<StoredRecord>>>,
}

impl MemoryRecordStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Copies out all rows.
    #[must_use]
    pub fn snapshot(&self) -> Vec<StoredRecord> {
        self.rows.lock().clone()
    }

    /// Rows of one table.
    #[must_use]
    pub fn table(&self, kind: EntityKind) -> Vec<StoredRecord> {
        self.rows
            .lock()
            .iter()
            .filter(|row| row.table == kind.table())
            .cloned()
            .collect()
    }
}

#[async_trait]
impl RecordStore for MemoryRecordStore {
    async fn insert(&self, kind: EntityKind, payload: Value) -> Result<RecordId, StoreError> {
        let record = StoredRecord::new(kind, payload);
        let id = record.id.clone();
        self.rows.lock().push(record);
        Ok(id)
    }
}

/// Append-only JSON-lines store.
#[derive(Debug, Clone)]
pub struct JsonlRecordStore {
    path: PathBuf,
}

impl JsonlRecordStore {
    /// Appends to `path`, creating parent folders.
    pub fn new(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|err| StoreError::Io(err.to_string()))?;
        }
        Ok(Self { path })
    }

    /// Destination file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl RecordStore for JsonlRecordStore {
    async fn insert(&self, kind: EntityKind, payload: Value) -> Result<RecordId, StoreError> {
        let record = StoredRecord::new(kind, payload);
        let mut line = serde_json::to_vec(&record)
            .map_err(|err| StoreError::Serialization(err.to_string()))?;
        line.push(b'\n');
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await
            .map_err(|err| StoreError::Io(err.to_string()))?;
        file.write_all(&line)
            .await
            .map_err(|err| StoreError::Io(err.to_string()))?;
        file.flush()
            .await
            .map_err(|err| StoreError::Io(err.to_string()))?;
        Ok(record.id)
    }
}
