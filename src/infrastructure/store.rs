//! Roadmap store backends
//!
//! `JsonFileStore` keeps one `<id>.json` file per roadmap in a data directory.
//! `MemoryStore` keeps records in a map and is used by tests and dry runs.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use tracing::{debug, instrument, warn};

use crate::domain::RoadMapRecord;
use crate::infrastructure::error::{StoreError, StoreResult};
use crate::infrastructure::traits::{FileSystem, RoadMapStore};

const RECORD_EXTENSION: &str = "json";

/// File-per-record store.
pub struct JsonFileStore {
    fs: Arc<dyn FileSystem>,
    data_dir: PathBuf,
}

impl JsonFileStore {
    pub fn new(fs: Arc<dyn FileSystem>, data_dir: impl Into<PathBuf>) -> Self {
        Self {
            fs,
            data_dir: data_dir.into(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Record path for `id`; ids must be plain file names.
    fn record_path(&self, id: &str) -> StoreResult<PathBuf> {
        let valid = !id.is_empty()
            && id != "."
            && id != ".."
            && id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));
        if !valid {
            return Err(StoreError::InvalidId(id.to_string()));
        }
        Ok(self
            .data_dir
            .join(format!("{}.{}", id, RECORD_EXTENSION)))
    }

    fn read_record(&self, path: &Path) -> StoreResult<RoadMapRecord> {
        let content = self
            .fs
            .read_to_string(path)
            .map_err(|e| StoreError::io(format!("read {}", path.display()), e))?;
        serde_json::from_str(&content).map_err(|source| StoreError::Decode {
            path: path.to_path_buf(),
            source,
        })
    }
}

impl RoadMapStore for JsonFileStore {
    #[instrument(level = "debug", skip(self, defaults), fields(id = %defaults.id))]
    fn get_or_create(&self, defaults: RoadMapRecord) -> StoreResult<(RoadMapRecord, bool)> {
        if let Some(existing) = self.search(&defaults.id)? {
            return Ok((existing, false));
        }
        self.save(&defaults)?;
        Ok((defaults, true))
    }

    #[instrument(level = "debug", skip(self, record), fields(id = %record.id))]
    fn save(&self, record: &RoadMapRecord) -> StoreResult<()> {
        let path = self.record_path(&record.id)?;
        let content =
            serde_json::to_string_pretty(record).map_err(|source| StoreError::Encode {
                id: record.id.clone(),
                source,
            })?;
        self.fs
            .create_dir_all(&self.data_dir)
            .map_err(|e| StoreError::io(format!("create {}", self.data_dir.display()), e))?;
        self.fs
            .write(&path, &content)
            .map_err(|e| StoreError::io(format!("write {}", path.display()), e))?;
        debug!("saved {}", path.display());
        Ok(())
    }

    #[instrument(level = "debug", skip(self))]
    fn search(&self, id: &str) -> StoreResult<Option<RoadMapRecord>> {
        let path = self.record_path(id)?;
        if !self.fs.exists(&path) {
            return Ok(None);
        }
        self.read_record(&path).map(Some)
    }

    #[instrument(level = "debug", skip(self))]
    fn list(&self) -> StoreResult<Vec<RoadMapRecord>> {
        if !self.fs.exists(&self.data_dir) {
            return Ok(Vec::new());
        }
        let files = self
            .fs
            .list_files(&self.data_dir)
            .map_err(|e| StoreError::io(format!("list {}", self.data_dir.display()), e))?;

        let mut records = Vec::new();
        for path in files
            .iter()
            .filter(|p| p.extension().is_some_and(|ext| ext == RECORD_EXTENSION))
        {
            match self.read_record(path) {
                Ok(record) => records.push(record),
                Err(e) => warn!("skipping unreadable record {}: {}", path.display(), e),
            }
        }
        records.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(records)
    }

    #[instrument(level = "debug", skip(self))]
    fn delete(&self, id: &str) -> StoreResult<usize> {
        let path = self.record_path(id)?;
        if !self.fs.exists(&path) {
            return Ok(0);
        }
        self.fs
            .remove_file(&path)
            .map_err(|e| StoreError::io(format!("remove {}", path.display()), e))?;
        Ok(1)
    }
}

/// In-memory store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: Mutex<BTreeMap<String, RoadMapRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RoadMapStore for MemoryStore {
    fn get_or_create(&self, defaults: RoadMapRecord) -> StoreResult<(RoadMapRecord, bool)> {
        let mut records = self.records.lock().map_err(|_| StoreError::Poisoned)?;
        if let Some(existing) = records.get(&defaults.id) {
            return Ok((existing.clone(), false));
        }
        records.insert(defaults.id.clone(), defaults.clone());
        Ok((defaults, true))
    }

    fn save(&self, record: &RoadMapRecord) -> StoreResult<()> {
        let mut records = self.records.lock().map_err(|_| StoreError::Poisoned)?;
        records.insert(record.id.clone(), record.clone());
        Ok(())
    }

    fn search(&self, id: &str) -> StoreResult<Option<RoadMapRecord>> {
        let records = self.records.lock().map_err(|_| StoreError::Poisoned)?;
        Ok(records.get(id).cloned())
    }

    fn list(&self) -> StoreResult<Vec<RoadMapRecord>> {
        let records = self.records.lock().map_err(|_| StoreError::Poisoned)?;
        Ok(records.values().cloned().collect())
    }

    fn delete(&self, id: &str) -> StoreResult<usize> {
        let mut records = self.records.lock().map_err(|_| StoreError::Poisoned)?;
        Ok(usize::from(records.remove(id).is_some()))
    }
}
