//! Roadmap service
//!
//! Load-modify-save workflows on persisted roadmaps, as used by the CLI.

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::application::{ApplicationError, ApplicationResult, IoResultExt, RoadMap};
use crate::domain::codec;
use crate::domain::{DomainError, FeedItem, Topic, TopicPatch, TopicTree};
use crate::infrastructure::traits::{FeedSource, FileSystem, RoadMapStore};

/// One line of `list` output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapSummary {
    pub id: String,
    pub name: String,
    pub topics: usize,
}

/// Service for managing persisted roadmaps.
pub struct RoadMapService {
    store: Arc<dyn RoadMapStore>,
    feeds: Arc<dyn FeedSource>,
    fs: Arc<dyn FileSystem>,
}

impl RoadMapService {
    pub fn new(
        store: Arc<dyn RoadMapStore>,
        feeds: Arc<dyn FeedSource>,
        fs: Arc<dyn FileSystem>,
    ) -> Self {
        Self { store, feeds, fs }
    }

    /// Create and persist an empty roadmap.
    pub fn create_map(
        &self,
        id: &str,
        name: &str,
        description: Option<String>,
    ) -> ApplicationResult<RoadMap> {
        if self.store.search(id)?.is_some() {
            return Err(ApplicationError::MapAlreadyExists(id.to_string()));
        }
        let mut map = RoadMap::new(id, name, description);
        map.put(self.store.as_ref())?;
        info!("created roadmap {}", id);
        Ok(map)
    }

    /// Load a roadmap, failing if it does not exist.
    pub fn open(&self, id: &str) -> ApplicationResult<RoadMap> {
        RoadMap::get_map(self.store.as_ref(), id)?
            .ok_or_else(|| ApplicationError::MapNotFound(id.to_string()))
    }

    pub fn add_topic(
        &self,
        map_id: &str,
        parent_id: &str,
        topic: Topic,
    ) -> ApplicationResult<Topic> {
        let mut map = self.open(map_id)?;
        let added = map
            .create(parent_id, topic.id, topic.name, topic.description)?
            .topic()
            .clone();
        map.put(self.store.as_ref())?;
        debug!("added {} below {} in {}", added.id, parent_id, map_id);
        Ok(added)
    }

    /// Remove a topic and its subtree, returning what was removed.
    pub fn remove_topic(&self, map_id: &str, topic_id: &str) -> ApplicationResult<TopicTree> {
        let mut map = self.open(map_id)?;
        let removed = map
            .delete(topic_id)
            .ok_or_else(|| DomainError::NodeNotFound(topic_id.to_string()))?;
        map.put(self.store.as_ref())?;
        Ok(removed)
    }

    pub fn edit_topic(
        &self,
        map_id: &str,
        topic_id: &str,
        patch: &TopicPatch,
    ) -> ApplicationResult<Topic> {
        let mut map = self.open(map_id)?;
        if !map.update(topic_id, patch) {
            return Err(DomainError::NodeNotFound(topic_id.to_string()).into());
        }
        map.put(self.store.as_ref())?;
        let topic = map
            .get(topic_id)
            .map(|n| n.topic().clone())
            .ok_or_else(|| DomainError::NodeNotFound(topic_id.to_string()))?;
        Ok(topic)
    }

    pub fn list(&self) -> ApplicationResult<Vec<MapSummary>> {
        let records = RoadMap::list(self.store.as_ref())?;
        Ok(records
            .into_iter()
            .map(|record| {
                let topics = match TopicTree::loads(&record.map_json) {
                    Ok(tree) => tree.node_count(),
                    Err(e) => {
                        warn!("roadmap {} has an unreadable tree: {}", record.id, e);
                        0
                    }
                };
                MapSummary {
                    id: record.id,
                    name: record.name,
                    topics,
                }
            })
            .collect())
    }

    pub fn delete_map(&self, id: &str) -> ApplicationResult<bool> {
        RoadMap::delete_map(self.store.as_ref(), id)
    }

    /// Write the serialized tree of `id` to `path` as JSON.
    pub fn export(&self, id: &str, path: &Path) -> ApplicationResult<()> {
        let map = self.open(id)?;
        self.fs
            .write(path, &codec::to_json(&map.to_dict()))
            .with_path_context("write roadmap", path)
    }

    /// Read a serialized tree from `path` and persist it as a new roadmap.
    ///
    /// The roadmap takes the root node's id; `name` defaults to the root label.
    pub fn import(&self, path: &Path, name: Option<&str>) -> ApplicationResult<RoadMap> {
        let content = self
            .fs
            .read_to_string(path)
            .with_path_context("read roadmap", path)?;
        let tree = TopicTree::loads(&codec::from_json(&content)?)?;
        let root = tree.root_ref();
        let id = root.id().to_string();
        let name = name.unwrap_or(root.name()).to_string();
        if self.store.search(&id)?.is_some() {
            return Err(ApplicationError::MapAlreadyExists(id));
        }
        let mut map = RoadMap::from_tree(id, name, tree);
        map.put(self.store.as_ref())?;
        info!("imported roadmap {} from {}", map.id(), path.display());
        Ok(map)
    }

    pub async fn feeds(&self, id: &str) -> ApplicationResult<Vec<FeedItem>> {
        let map = self.open(id)?;
        map.feeds(self.feeds.as_ref()).await
    }
}
