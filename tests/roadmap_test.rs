//! Tests for the RoadMap handle: CRUD by id, persistence and feeds

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tempfile::TempDir;

use roadmap::application::{ApplicationError, RoadMap};
use roadmap::domain::{codec, DomainError, FeedItem, RoadMapRecord, TopicPatch, TopicTree};
use roadmap::infrastructure::traits::{FeedSource, RealFileSystem, RoadMapStore};
use roadmap::infrastructure::{FeedResult, JsonFileStore, MemoryStore, StoreError, StoreResult};
use roadmap::util::testing;

fn hackmap() -> RoadMap {
    testing::init_test_setup();
    let mut map = RoadMap::new("1", "hackmap", Some("Start of 2015".into()));
    map.create("1", "1.1", "Web Dev", Some("Web Development".into()))
        .unwrap();
    map.create("1", "1.2", "Machine Learning", Some("ML".into()))
        .unwrap();
    map
}

/// Store whose every operation fails.
struct BrokenStore;

impl RoadMapStore for BrokenStore {
    fn get_or_create(&self, _defaults: RoadMapRecord) -> StoreResult<(RoadMapRecord, bool)> {
        Err(StoreError::Poisoned)
    }
    fn save(&self, _record: &RoadMapRecord) -> StoreResult<()> {
        Err(StoreError::Poisoned)
    }
    fn search(&self, _id: &str) -> StoreResult<Option<RoadMapRecord>> {
        Err(StoreError::Poisoned)
    }
    fn list(&self) -> StoreResult<Vec<RoadMapRecord>> {
        Err(StoreError::Poisoned)
    }
    fn delete(&self, _id: &str) -> StoreResult<usize> {
        Err(StoreError::Poisoned)
    }
}

/// Feed source that records the topics it was asked for.
#[derive(Default)]
struct RecordingFeeds {
    calls: Mutex<Vec<Vec<String>>>,
}

#[async_trait]
impl FeedSource for RecordingFeeds {
    async fn fetch(&self, topics: &[String]) -> FeedResult<Vec<FeedItem>> {
        self.calls.lock().unwrap().push(topics.to_vec());
        Ok(topics
            .iter()
            .map(|t| FeedItem {
                topic: t.clone(),
                title: format!("News about {}", t),
                url: format!("https://example.com/{}", t.replace(' ', "-")),
                points: Some(1),
                author: None,
            })
            .collect())
    }
}

// ============================================================
// CRUD by id
// ============================================================

#[test]
fn given_missing_parent_when_create_then_nothing_attached() {
    let mut map = hackmap();

    let result = map.create("3", "3.1", "Rust", None);

    assert_eq!(result.unwrap_err(), DomainError::ParentNotFound("3".into()));
    assert!(map.get("3.1").is_none());
}

#[test]
fn given_nested_create_when_get_then_found_anywhere() {
    let mut map = hackmap();
    map.create("1.1", "1.1.1", "HTML", None).unwrap();

    let node = map.get("1.1.1").unwrap();

    assert_eq!(node.name(), "HTML");
    assert_eq!(node.parent().unwrap().id(), "1.1");
}

#[test]
fn given_update_with_blank_name_when_update_then_keeps_name() {
    let mut map = hackmap();

    let patch = TopicPatch::new().name("").description("Frontend and backend");
    assert!(map.update("1.1", &patch));

    let node = map.get("1.1").unwrap();
    assert_eq!(node.name(), "Web Dev");
    assert_eq!(node.description(), Some("Frontend and backend"));
}

#[test]
fn given_topic_when_delete_then_returns_detached_subtree() {
    let mut map = hackmap();

    let removed = map.delete("1.2").unwrap();

    assert_eq!(removed.root_ref().name(), "Machine Learning");
    assert!(map.get("1.2").is_none());
    assert!(map.delete("1.2").is_none());
}

#[test]
fn given_hackmap_when_keys_then_names_in_pre_order() {
    let map = hackmap();

    assert_eq!(map.keys(), vec!["hackmap", "Web Dev", "Machine Learning"]);
}

// ============================================================
// Persistence
// ============================================================

#[test]
fn given_roadmap_when_put_and_get_map_then_equivalent_handle() {
    let store = MemoryStore::new();
    let mut map = hackmap();

    let id = map.put(&store).unwrap();
    let loaded = RoadMap::get_map(&store, "1").unwrap().unwrap();

    assert_eq!(id, "1");
    assert_eq!(map.sno(), Some("1"));
    assert_eq!(loaded.sno(), Some("1"));
    assert_eq!(loaded.name(), "hackmap");
    assert_eq!(loaded.to_dict(), map.to_dict());
    assert_eq!(loaded.keys(), map.keys());
}

#[test]
fn given_new_record_when_put_then_stores_name_description_and_tree() {
    let store = MemoryStore::new();
    let mut map = hackmap();

    map.put(&store).unwrap();

    let record = store.search("1").unwrap().unwrap();
    assert_eq!(record.name, "hackmap");
    assert_eq!(record.description, "Start of 2015");
    assert_eq!(record.map_json, map.to_dict());
}

#[test]
fn given_changed_roadmap_when_put_again_then_overwrites_record() {
    let store = MemoryStore::new();
    let mut map = hackmap();
    map.put(&store).unwrap();

    map.create("1.2", "1.2.1", "Regression", None).unwrap();
    map.put(&store).unwrap();

    let loaded = RoadMap::get_map(&store, "1").unwrap().unwrap();
    assert!(loaded.get("1.2.1").is_some());
    assert_eq!(RoadMap::list(&store).unwrap().len(), 1);
}

#[test]
fn given_unknown_id_when_get_map_then_none() {
    let store = MemoryStore::new();

    assert!(RoadMap::get_map(&store, "nope").unwrap().is_none());
}

#[test]
fn given_record_with_malformed_tree_when_get_map_then_domain_error() {
    let store = MemoryStore::new();
    store.save(&RoadMapRecord::empty("1")).unwrap();

    let err = RoadMap::get_map(&store, "1").unwrap_err();

    assert!(matches!(
        err,
        ApplicationError::Domain(DomainError::MalformedTree { .. })
    ));
}

#[test]
fn given_stored_roadmaps_when_list_then_all_records_by_id() {
    let store = MemoryStore::new();
    RoadMap::new("b", "second", None).put(&store).unwrap();
    RoadMap::new("a", "first", None).put(&store).unwrap();

    let ids: Vec<String> = RoadMap::list(&store)
        .unwrap()
        .into_iter()
        .map(|r| r.id)
        .collect();

    assert_eq!(ids, vec!["a", "b"]);
}

#[test]
fn given_stored_roadmap_when_delete_map_twice_then_true_then_false() {
    let store = MemoryStore::new();
    hackmap().put(&store).unwrap();

    assert!(RoadMap::delete_map(&store, "1").unwrap());
    assert!(!RoadMap::delete_map(&store, "1").unwrap());
    assert!(RoadMap::get_map(&store, "1").unwrap().is_none());
}

#[test]
fn given_store_fault_when_delete_map_then_typed_store_error() {
    testing::init_test_setup();

    let err = RoadMap::delete_map(&BrokenStore, "1").unwrap_err();

    assert!(matches!(err, ApplicationError::Store(StoreError::Poisoned)));
}

#[test]
fn given_file_store_when_put_then_survives_new_store_instance() {
    let dir = TempDir::new().unwrap();
    let fs = Arc::new(RealFileSystem);
    let mut map = hackmap();
    map.put(&JsonFileStore::new(fs.clone(), dir.path())).unwrap();

    let reopened = JsonFileStore::new(fs, dir.path());
    let loaded = RoadMap::get_map(&reopened, "1").unwrap().unwrap();

    assert!(dir.path().join("1.json").exists());
    assert_eq!(loaded.to_dict(), map.to_dict());
}

// ============================================================
// Feeds
// ============================================================

#[tokio::test]
async fn given_roadmap_when_feeds_then_one_call_with_every_name() {
    let map = hackmap();
    let feeds = RecordingFeeds::default();

    let items = map.feeds(&feeds).await.unwrap();

    let calls = feeds.calls.lock().unwrap();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0], vec!["hackmap", "Web Dev", "Machine Learning"]);
    assert_eq!(items.len(), 3);
    assert_eq!(items[1].url, "https://example.com/Web-Dev");
}

#[tokio::test]
async fn given_unnamed_root_when_feeds_then_blank_name_not_queried() {
    testing::init_test_setup();
    let dict = codec::from_json(
        r#"{"1": {"id": "1", "label": null, "description": null,
                 "children": {"1.1": {"id": "1.1", "label": "Web Dev", "description": null, "children": {}}}}}"#,
    )
    .unwrap();
    let map = RoadMap::from_tree("1", "", TopicTree::loads(&dict).unwrap());
    let feeds = RecordingFeeds::default();

    map.feeds(&feeds).await.unwrap();

    assert_eq!(feeds.calls.lock().unwrap()[0], vec!["Web Dev"]);
}
