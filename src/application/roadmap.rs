//! The roadmap handle: a topic tree with an external id and a name.

use tracing::{debug, error, info, instrument};

use crate::application::ApplicationResult;
use crate::domain::{
    DomainResult, FeedItem, NodeRef, RoadMapRecord, Topic, TopicPatch, TopicTree, TreeDict,
};
use crate::infrastructure::traits::{FeedSource, RoadMapStore};

/// Addressable roadmap wrapping a root topic.
///
/// The root topic shares the roadmap's id. Store and feed dependencies are
/// passed per call.
#[derive(Debug, Clone)]
pub struct RoadMap {
    id: String,
    name: String,
    tree: TopicTree,
    /// Id of the persisted record, once saved or loaded
    sno: Option<String>,
}

impl RoadMap {
    pub fn new(id: impl Into<String>, name: impl Into<String>, description: Option<String>) -> Self {
        let id = id.into();
        let name = name.into();
        let tree = TopicTree::new(Topic::new(id.clone(), name.clone(), description));
        Self {
            id,
            name,
            tree,
            sno: None,
        }
    }

    /// Wrap an existing tree, e.g. one rebuilt from a dict.
    pub fn from_tree(id: impl Into<String>, name: impl Into<String>, tree: TopicTree) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            tree,
            sno: None,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn sno(&self) -> Option<&str> {
        self.sno.as_deref()
    }

    pub fn tree(&self) -> &TopicTree {
        &self.tree
    }

    pub fn root(&self) -> NodeRef<'_> {
        self.tree.root_ref()
    }

    /// Attach a new topic below `parent_id`.
    pub fn create(
        &mut self,
        parent_id: &str,
        id: impl Into<String>,
        name: impl Into<String>,
        description: Option<String>,
    ) -> DomainResult<NodeRef<'_>> {
        self.tree
            .add_node(parent_id, Topic::new(id, name, description))
    }

    pub fn get(&self, id: &str) -> Option<NodeRef<'_>> {
        self.tree.find_node(id)
    }

    /// Detach the topic with `id` and everything below it.
    pub fn delete(&mut self, id: &str) -> Option<TopicTree> {
        self.tree.remove_node(id)
    }

    pub fn update(&mut self, id: &str, patch: &TopicPatch) -> bool {
        self.tree.update_node(id, patch)
    }

    pub fn to_dict(&self) -> TreeDict {
        self.tree.to_dict()
    }

    /// Names of every topic, pre-order.
    pub fn keys(&self) -> Vec<String> {
        self.tree.keys()
    }

    /// Upsert this roadmap into `store`, returning the persisted id.
    #[instrument(level = "debug", skip(self, store), fields(id = %self.id))]
    pub fn put(&mut self, store: &dyn RoadMapStore) -> ApplicationResult<String> {
        let (mut record, created) = store.get_or_create(RoadMapRecord::empty(&self.id))?;
        debug!(created, "upserting roadmap record");
        record.name = self.name.clone();
        record.description = self.root().description().unwrap_or_default().to_string();
        record.map_json = self.tree.to_dict();
        store.save(&record)?;
        self.sno = Some(record.id.clone());
        Ok(record.id)
    }

    /// Load a roadmap from `store`; None if no record has `id`.
    #[instrument(level = "debug", skip(store))]
    pub fn get_map(store: &dyn RoadMapStore, id: &str) -> ApplicationResult<Option<Self>> {
        let Some(record) = store.search(id)? else {
            return Ok(None);
        };
        let tree = TopicTree::loads(&record.map_json)?;
        let mut map = Self::from_tree(record.id.clone(), record.name, tree);
        map.sno = Some(record.id);
        Ok(Some(map))
    }

    pub fn list(store: &dyn RoadMapStore) -> ApplicationResult<Vec<RoadMapRecord>> {
        Ok(store.list()?)
    }

    /// Delete the record with `id`.
    ///
    /// `Ok(false)` if there was nothing to delete. Store faults are logged and
    /// returned.
    #[instrument(level = "debug", skip(store))]
    pub fn delete_map(store: &dyn RoadMapStore, id: &str) -> ApplicationResult<bool> {
        match store.delete(id) {
            Ok(removed) => {
                info!(removed, "deleted roadmap {}", id);
                Ok(removed > 0)
            }
            Err(e) => {
                error!("failed to delete roadmap {}: {}", id, e);
                Err(e.into())
            }
        }
    }

    /// Related news for every named topic in the tree.
    #[instrument(level = "debug", skip(self, source), fields(id = %self.id))]
    pub async fn feeds(&self, source: &dyn FeedSource) -> ApplicationResult<Vec<FeedItem>> {
        let topics: Vec<String> = self.keys().into_iter().filter(|k| !k.is_empty()).collect();
        Ok(source.fetch(&topics).await?)
    }
}
