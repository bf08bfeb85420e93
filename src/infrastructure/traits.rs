//! I/O boundary traits for testability
//!
//! These traits abstract external I/O operations, allowing services
//! to be tested with mock implementations.

use std::io;
use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::domain::{FeedItem, RoadMapRecord};
use crate::infrastructure::error::{FeedResult, StoreResult};

/// Filesystem abstraction for testability.
pub trait FileSystem: Send + Sync {
    /// Read file contents to string.
    fn read_to_string(&self, path: &Path) -> io::Result<String>;

    /// Write string content to file.
    fn write(&self, path: &Path, content: &str) -> io::Result<()>;

    /// Check if path exists.
    fn exists(&self, path: &Path) -> bool;

    /// Create directory and all parent directories.
    fn create_dir_all(&self, path: &Path) -> io::Result<()>;

    /// Remove a file.
    fn remove_file(&self, path: &Path) -> io::Result<()>;

    /// Regular files directly inside `dir`.
    fn list_files(&self, dir: &Path) -> io::Result<Vec<PathBuf>>;
}

/// Key-value store for persisted roadmaps, keyed by roadmap id.
pub trait RoadMapStore: Send + Sync {
    /// Fetch the record with `defaults.id`, inserting `defaults` if absent.
    ///
    /// The flag is true if the record was created.
    fn get_or_create(&self, defaults: RoadMapRecord) -> StoreResult<(RoadMapRecord, bool)>;

    /// Insert or overwrite a record.
    fn save(&self, record: &RoadMapRecord) -> StoreResult<()>;

    fn search(&self, id: &str) -> StoreResult<Option<RoadMapRecord>>;

    /// All records, ordered by id.
    fn list(&self) -> StoreResult<Vec<RoadMapRecord>>;

    /// Delete by id, returning the number of records removed.
    fn delete(&self, id: &str) -> StoreResult<usize>;
}

/// News lookup for a set of topics.
#[async_trait]
pub trait FeedSource: Send + Sync {
    async fn fetch(&self, topics: &[String]) -> FeedResult<Vec<FeedItem>>;
}

// ============================================================
// REAL IMPLEMENTATIONS
// ============================================================

/// Real filesystem implementation.
#[derive(Debug, Default)]
pub struct RealFileSystem;

impl FileSystem for RealFileSystem {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        std::fs::read_to_string(path)
    }

    fn write(&self, path: &Path, content: &str) -> io::Result<()> {
        std::fs::write(path, content)
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        std::fs::create_dir_all(path)
    }

    fn remove_file(&self, path: &Path) -> io::Result<()> {
        std::fs::remove_file(path)
    }

    fn list_files(&self, dir: &Path) -> io::Result<Vec<PathBuf>> {
        let mut files = Vec::new();
        for entry in std::fs::read_dir(dir)? {
            let entry = entry?;
            if entry.file_type()?.is_file() {
                files.push(entry.path());
            }
        }
        Ok(files)
    }
}
