//! Tests for the Hacker News feed client against a mock server

use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use roadmap::config::FeedConfig;
use roadmap::infrastructure::traits::FeedSource;
use roadmap::infrastructure::{FeedError, HackerNewsFeeds};
use roadmap::util::testing;

fn client_for(server: &MockServer) -> HackerNewsFeeds {
    testing::init_test_setup();
    HackerNewsFeeds::new(&FeedConfig {
        base_url: server.uri(),
        hits_per_topic: 2,
    })
    .expect("build client")
}

#[tokio::test]
async fn given_topics_when_fetch_then_one_search_per_topic() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/search"))
        .and(query_param("query", "Rust"))
        .and(query_param("tags", "story"))
        .and(query_param("hitsPerPage", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "hits": [
                {"objectID": "1", "title": "Rust 2.0", "url": "https://rust.example", "points": 300, "author": "ferris"},
                {"objectID": "2", "title": "Ask HN: Learning Rust", "url": null, "points": 12, "author": "newbie"}
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/search"))
        .and(query_param("query", "Web Dev"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"hits": []})))
        .expect(1)
        .mount(&server)
        .await;

    let items = client_for(&server)
        .fetch(&["Rust".to_string(), "Web Dev".to_string()])
        .await
        .unwrap();

    assert_eq!(items.len(), 2);
    assert!(items.iter().all(|i| i.topic == "Rust"));
    assert_eq!(items[0].url, "https://rust.example");
    assert_eq!(items[0].points, Some(300));
    assert_eq!(items[1].url, "https://news.ycombinator.com/item?id=2");
}

#[tokio::test]
async fn given_server_error_when_fetch_then_http_error_names_topic() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/search"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .fetch(&["Rust".to_string()])
        .await
        .unwrap_err();

    assert!(matches!(err, FeedError::Http { ref topic, .. } if topic == "Rust"));
}

#[tokio::test]
async fn given_no_topics_when_fetch_then_no_requests() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let items = client_for(&server).fetch(&[]).await.unwrap();

    assert!(items.is_empty());
}
