//! Service container for dependency injection
//!
//! Wires up all services with their dependencies.

use std::sync::Arc;

use crate::application::services::RoadMapService;
use crate::config::Settings;
use crate::infrastructure::error::FeedResult;
use crate::infrastructure::feeds::HackerNewsFeeds;
use crate::infrastructure::store::JsonFileStore;
use crate::infrastructure::traits::{FeedSource, FileSystem, RealFileSystem, RoadMapStore};

/// Container holding all application services.
pub struct ServiceContainer {
    /// Application settings
    pub settings: Arc<Settings>,

    /// Filesystem abstraction
    pub fs: Arc<dyn FileSystem>,

    /// Persisted roadmaps
    pub store: Arc<dyn RoadMapStore>,

    /// News lookup
    pub feeds: Arc<dyn FeedSource>,
}

impl ServiceContainer {
    /// Create a new service container with real implementations.
    pub fn new(settings: Settings) -> FeedResult<Self> {
        let fs: Arc<dyn FileSystem> = Arc::new(RealFileSystem);
        let store = Arc::new(JsonFileStore::new(fs.clone(), settings.data_dir.clone()));
        let feeds = Arc::new(HackerNewsFeeds::new(&settings.feeds)?);
        Ok(Self::with_deps(settings, fs, store, feeds))
    }

    /// Create a service container with custom dependencies (for testing).
    pub fn with_deps(
        settings: Settings,
        fs: Arc<dyn FileSystem>,
        store: Arc<dyn RoadMapStore>,
        feeds: Arc<dyn FeedSource>,
    ) -> Self {
        let settings = Arc::new(settings);

        Self {
            settings,
            fs,
            store,
            feeds,
        }
    }

    pub fn roadmap_service(&self) -> RoadMapService {
        RoadMapService::new(self.store.clone(), self.feeds.clone(), self.fs.clone())
    }
}
