//! Hacker News feed lookup via the Algolia search API.

use async_trait::async_trait;
use futures::future::join_all;
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::config::FeedConfig;
use crate::domain::FeedItem;
use crate::infrastructure::error::{FeedError, FeedResult};
use crate::infrastructure::traits::FeedSource;

const ITEM_URL: &str = "https://news.ycombinator.com/item?id=";

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    hits: Vec<SearchHit>,
}

#[derive(Debug, Deserialize)]
struct SearchHit {
    #[serde(rename = "objectID")]
    object_id: String,
    title: Option<String>,
    url: Option<String>,
    points: Option<u64>,
    author: Option<String>,
}

impl SearchHit {
    fn into_item(self, topic: &str) -> FeedItem {
        FeedItem {
            topic: topic.to_string(),
            title: self.title.unwrap_or_default(),
            url: self
                .url
                .filter(|u| !u.is_empty())
                .unwrap_or_else(|| format!("{}{}", ITEM_URL, self.object_id)),
            points: self.points,
            author: self.author,
        }
    }
}

/// Story search on Hacker News, one query per topic.
pub struct HackerNewsFeeds {
    client: reqwest::Client,
    base_url: String,
    hits_per_topic: usize,
}

impl HackerNewsFeeds {
    pub fn new(config: &FeedConfig) -> FeedResult<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("roadmap/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(FeedError::Client)?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            hits_per_topic: config.hits_per_topic,
        })
    }

    #[instrument(level = "debug", skip(self))]
    async fn search(&self, topic: &str) -> FeedResult<Vec<FeedItem>> {
        let url = format!("{}/api/v1/search", self.base_url);
        let hits = self.hits_per_topic.to_string();
        let http_err = |source: reqwest::Error| FeedError::Http {
            topic: topic.to_string(),
            source,
        };

        let response: SearchResponse = self
            .client
            .get(&url)
            .query(&[("query", topic), ("tags", "story"), ("hitsPerPage", hits.as_str())])
            .send()
            .await
            .map_err(http_err)?
            .error_for_status()
            .map_err(http_err)?
            .json()
            .await
            .map_err(http_err)?;

        debug!("{} hits for '{}'", response.hits.len(), topic);
        Ok(response
            .hits
            .into_iter()
            .map(|hit| hit.into_item(topic))
            .collect())
    }
}

#[async_trait]
impl FeedSource for HackerNewsFeeds {
    async fn fetch(&self, topics: &[String]) -> FeedResult<Vec<FeedItem>> {
        let results = join_all(topics.iter().map(|t| self.search(t))).await;
        let mut items = Vec::new();
        for result in results {
            items.extend(result?);
        }
        Ok(items)
    }
}
