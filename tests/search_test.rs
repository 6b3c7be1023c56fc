//! Integration tests for the search module against a mocked engine.

use mockito::Matcher;
use serde_json::json;

use post_search::config::{EngineConfig, SearchConfig};
use post_search::models::Post;
use post_search::search::{
    BulkLoader, EngineClient, IndexManager, PostRecord, SearchError, SearchService,
};

const BULK_FILTER_PATH: &str = "took,errors,items.index._id,items.index.status,items.index.error";

fn test_engine_config(url: &str) -> EngineConfig {
    EngineConfig {
        host: url.to_string(),
        username: "elastic".to_string(),
        password: "elastic".to_string(),
        timeout_secs: 5,
        max_retries: 0,
        retry_backoff_secs: 0,
    }
}

fn test_search_config() -> SearchConfig {
    SearchConfig {
        index: "posts".to_string(),
        synonyms: vec![
            "js, javascript".to_string(),
            "k8s, k9s, Kubernetes".to_string(),
        ],
    }
}

fn test_records() -> Vec<PostRecord> {
    serde_json::from_value(json!([
        {
            "_id": "1",
            "title": "Intro to Kubernetes",
            "subtitle": "k8s basics",
            "tags": ["kubernetes"],
            "display_tag": "DevOps",
            "image_url": "https://example.com/k8s.png",
            "published_at": "2023-04-12",
            "reading_time": 6.5,
            "url": "https://example.com/posts/intro-to-kubernetes"
        },
        {
            "_id": "2",
            "title": "JavaScript Tips",
            "subtitle": "js patterns",
            "tags": [],
            "display_tag": "Web",
            "image_url": "https://example.com/js.png",
            "published_at": "2023-01-30",
            "reading_time": 3.0,
            "url": "https://example.com/posts/javascript-tips"
        }
    ]))
    .unwrap()
}

fn expected_create_body() -> serde_json::Value {
    let searchable = json!({
        "type": "text",
        "search_analyzer": "post_search_analyzer",
        "fields": {
            "ngrams": {
                "type": "text",
                "analyzer": "post_index_analyzer",
                "search_analyzer": "post_search_analyzer",
            },
        },
    });

    json!({
        "settings": {
            "analysis": {
                "analyzer": {
                    "post_index_analyzer": {
                        "type": "custom",
                        "tokenizer": "standard",
                        "filter": ["lowercase", "autocomplete_filter"],
                    },
                    "post_search_analyzer": {
                        "type": "custom",
                        "tokenizer": "standard",
                        "filter": ["lowercase", "synonym_filter"],
                    },
                },
                "filter": {
                    "autocomplete_filter": {
                        "type": "edge_ngram",
                        "min_gram": 1,
                        "max_gram": 20,
                    },
                    "synonym_filter": {
                        "type": "synonym_graph",
                        "expand": true,
                        "lenient": true,
                        "synonyms": ["js, javascript", "k8s, k9s, Kubernetes"],
                    },
                },
            },
        },
        "mappings": {
            "properties": {
                "display_tag": {"type": "text"},
                "id": {"type": "keyword"},
                "image_url": {"type": "keyword"},
                "published_at": {"type": "date", "format": "yyyy-MM-dd"},
                "reading_time": {"type": "float"},
                "subtitle": searchable.clone(),
                "tags": {"type": "text"},
                "title": searchable,
                "url": {"type": "keyword"},
            },
        },
    })
}

#[tokio::test]
async fn test_recreate_when_index_absent() {
    let mut server = mockito::Server::new_async().await;
    let delete = server
        .mock("DELETE", "/posts")
        .with_status(404)
        .with_body(r#"{"error":{"type":"index_not_found_exception"},"status":404}"#)
        .create_async()
        .await;
    let create = server
        .mock("PUT", "/posts")
        .match_body(Matcher::Json(expected_create_body()))
        .with_status(200)
        .with_body(r#"{"acknowledged":true,"index":"posts"}"#)
        .create_async()
        .await;

    let config = test_engine_config(&server.url());
    let client = EngineClient::connect(&config, "posts").unwrap();
    let search_config = test_search_config();
    let manager = IndexManager::new(&client, &search_config);

    manager.recreate().await.unwrap();

    delete.assert_async().await;
    create.assert_async().await;
}

#[tokio::test]
async fn test_recreate_when_index_present() {
    let mut server = mockito::Server::new_async().await;
    let delete = server
        .mock("DELETE", "/posts")
        .with_status(200)
        .with_body(r#"{"acknowledged":true}"#)
        .create_async()
        .await;
    let create = server
        .mock("PUT", "/posts")
        .with_status(200)
        .with_body(r#"{"acknowledged":true,"index":"posts"}"#)
        .create_async()
        .await;

    let config = test_engine_config(&server.url());
    let client = EngineClient::connect(&config, "posts").unwrap();
    let search_config = test_search_config();
    let manager = IndexManager::new(&client, &search_config);

    manager.recreate().await.unwrap();

    delete.assert_async().await;
    create.assert_async().await;
}

#[tokio::test]
async fn test_recreate_propagates_create_failure() {
    let mut server = mockito::Server::new_async().await;
    let _delete_mock = server
        .mock("DELETE", "/posts")
        .with_status(200)
        .with_body(r#"{"acknowledged":true}"#)
        .create_async()
        .await;
    let _create_mock = server
        .mock("PUT", "/posts")
        .with_status(400)
        .with_body(r#"{"error":{"type":"illegal_argument_exception"},"status":400}"#)
        .create_async()
        .await;

    let config = test_engine_config(&server.url());
    let client = EngineClient::connect(&config, "posts").unwrap();
    let search_config = test_search_config();
    let manager = IndexManager::new(&client, &search_config);

    let err = manager.recreate().await.unwrap_err();
    assert!(matches!(err, SearchError::Engine { status: 400, .. }));
}

#[tokio::test]
async fn test_ensure_exists_is_noop_when_present() {
    let mut server = mockito::Server::new_async().await;
    let head = server
        .mock("HEAD", "/posts")
        .with_status(200)
        .create_async()
        .await;
    let create = server
        .mock("PUT", "/posts")
        .expect(0)
        .create_async()
        .await;

    let config = test_engine_config(&server.url());
    let client = EngineClient::connect(&config, "posts").unwrap();
    let search_config = test_search_config();
    let manager = IndexManager::new(&client, &search_config);

    let created = manager.ensure_exists().await.unwrap();
    assert!(!created);

    head.assert_async().await;
    create.assert_async().await;
}

#[tokio::test]
async fn test_ensure_exists_creates_when_absent() {
    let mut server = mockito::Server::new_async().await;
    let _engine_mock = server
        .mock("HEAD", "/posts")
        .with_status(404)
        .create_async()
        .await;
    let create = server
        .mock("PUT", "/posts")
        .with_status(200)
        .with_body(r#"{"acknowledged":true,"index":"posts"}"#)
        .create_async()
        .await;

    let config = test_engine_config(&server.url());
    let client = EngineClient::connect(&config, "posts").unwrap();
    let search_config = test_search_config();
    let manager = IndexManager::new(&client, &search_config);

    let created = manager.ensure_exists().await.unwrap();
    assert!(created);

    create.assert_async().await;
}

#[tokio::test]
async fn test_bulk_load_submits_alternating_pairs() {
    let records = test_records();
    let posts: Vec<Post> = records.clone().into_iter().map(PostRecord::into_post).collect();

    // Action descriptor immediately followed by the document body, for
    // every document, newline-terminated.
    let mut expected_body = String::new();
    for post in &posts {
        expected_body.push_str(&format!(
            "{{\"index\":{{\"_index\":\"posts\",\"_id\":\"{}\"}}}}\n",
            post.id
        ));
        expected_body.push_str(&serde_json::to_string(post).unwrap());
        expected_body.push('\n');
    }

    let mut server = mockito::Server::new_async().await;
    let bulk = server
        .mock("POST", "/posts/_bulk")
        .match_query(Matcher::UrlEncoded(
            "filter_path".into(),
            BULK_FILTER_PATH.into(),
        ))
        .match_body(Matcher::Exact(expected_body))
        .with_status(200)
        .with_body(r#"{"took":5,"errors":false}"#)
        .create_async()
        .await;

    let config = test_engine_config(&server.url());
    let client = EngineClient::connect(&config, "posts").unwrap();
    let loader = BulkLoader::new(&client);

    let report = loader.load(records).await.unwrap();
    assert_eq!(report.submitted, 2);
    assert_eq!(report.took_ms, 5);

    bulk.assert_async().await;
}

#[tokio::test]
async fn test_bulk_load_surfaces_partial_failures() {
    let mut server = mockito::Server::new_async().await;
    let _engine_mock = server
        .mock("POST", "/posts/_bulk")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(
            r#"{"took":8,"errors":true,"items":[
                {"index":{"_id":"1","status":201}},
                {"index":{"_id":"2","status":400,"error":{"type":"mapper_parsing_exception","reason":"failed to parse"}}}
            ]}"#,
        )
        .create_async()
        .await;

    let config = test_engine_config(&server.url());
    let client = EngineClient::connect(&config, "posts").unwrap();
    let loader = BulkLoader::new(&client);

    let err = loader.load(test_records()).await.unwrap_err();
    match err {
        SearchError::BulkRejected { failures } => {
            assert_eq!(failures.len(), 1);
            assert_eq!(failures[0].id, "2");
            assert!(failures[0].reason.contains("mapper_parsing_exception"));
        }
        other => panic!("expected BulkRejected, got {other:?}"),
    }
}

#[tokio::test]
async fn test_bulk_load_rejects_invalid_record_before_engine_call() {
    let mut server = mockito::Server::new_async().await;
    let bulk = server
        .mock("POST", "/posts/_bulk")
        .match_query(Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let mut records = test_records();
    records[0].title = "   ".to_string();

    let config = test_engine_config(&server.url());
    let client = EngineClient::connect(&config, "posts").unwrap();
    let loader = BulkLoader::new(&client);

    let err = loader.load(records).await.unwrap_err();
    assert!(matches!(err, SearchError::InvalidDocument { ref id, .. } if id == "1"));

    bulk.assert_async().await;
}

#[tokio::test]
async fn test_search_maps_hits_in_engine_order() {
    let records = test_records();
    let posts: Vec<Post> = records.into_iter().map(PostRecord::into_post).collect();

    let mut server = mockito::Server::new_async().await;
    let search = server
        .mock("POST", "/posts/_search")
        .match_body(Matcher::Json(json!({
            "query": {
                "multi_match": {
                    "query": "k9s",
                    "type": "most_fields",
                    "operator": "and",
                    "fields": ["title^3", "title.ngrams", "subtitle^2", "subtitle.ngrams"],
                },
            },
        })))
        .with_status(200)
        .with_body(
            json!({
                "took": 2,
                "hits": {
                    "total": {"value": 2, "relation": "eq"},
                    "hits": [
                        {"_index": "posts", "_id": "1", "_score": 4.2, "_source": &posts[0]},
                        {"_index": "posts", "_id": "2", "_score": 1.1, "_source": &posts[1]},
                    ],
                },
            })
            .to_string(),
        )
        .create_async()
        .await;

    let config = test_engine_config(&server.url());
    let service = SearchService::new(config, &test_search_config());

    let found = service.search("k9s").await.unwrap();
    assert_eq!(found.len(), 2);
    // Engine relevance order is preserved, never re-sorted.
    assert_eq!(found[0].id, "1");
    assert_eq!(found[1].id, "2");
    assert_eq!(found[0].title, "Intro to Kubernetes");

    search.assert_async().await;
}

#[tokio::test]
async fn test_search_returns_empty_for_no_matches() {
    let mut server = mockito::Server::new_async().await;
    let _engine_mock = server
        .mock("POST", "/posts/_search")
        .with_status(200)
        .with_body(r#"{"took":1,"hits":{"total":{"value":0,"relation":"eq"},"hits":[]}}"#)
        .create_async()
        .await;

    let config = test_engine_config(&server.url());
    let service = SearchService::new(config, &test_search_config());

    let found = service.search("nonexistent").await.unwrap();
    assert!(found.is_empty());
}

#[tokio::test]
async fn test_blank_query_makes_no_engine_call() {
    let mut server = mockito::Server::new_async().await;
    let search = server
        .mock("POST", "/posts/_search")
        .expect(0)
        .create_async()
        .await;

    let config = test_engine_config(&server.url());
    let service = SearchService::new(config, &test_search_config());

    for query in ["", "   ", "\t\n"] {
        let err = service.search(query).await.unwrap_err();
        assert!(matches!(err, SearchError::EmptyQuery));
        assert_eq!(err.to_string(), "Please provide a valid query");
    }

    search.assert_async().await;
}

#[tokio::test]
async fn test_search_query_is_trimmed() {
    let mut server = mockito::Server::new_async().await;
    let search = server
        .mock("POST", "/posts/_search")
        .match_body(Matcher::PartialJson(json!({
            "query": {"multi_match": {"query": "k9s"}},
        })))
        .with_status(200)
        .with_body(r#"{"took":1,"hits":{"total":{"value":0,"relation":"eq"},"hits":[]}}"#)
        .create_async()
        .await;

    let config = test_engine_config(&server.url());
    let service = SearchService::new(config, &test_search_config());

    service.search("  k9s  ").await.unwrap();

    search.assert_async().await;
}

#[tokio::test]
async fn test_search_engine_failure_propagates() {
    let mut server = mockito::Server::new_async().await;
    let _engine_mock = server
        .mock("POST", "/posts/_search")
        .with_status(500)
        .with_body(r#"{"error":{"type":"search_phase_execution_exception"},"status":500}"#)
        .create_async()
        .await;

    let config = test_engine_config(&server.url());
    let service = SearchService::new(config, &test_search_config());

    let err = service.search("k9s").await.unwrap_err();
    assert!(matches!(err, SearchError::Engine { status: 500, .. }));
}

#[tokio::test]
async fn test_transient_failures_are_retried_within_bounds() {
    let mut server = mockito::Server::new_async().await;
    // Two retries configured: the initial attempt plus two more, then the
    // transient status surfaces as an engine error.
    let search = server
        .mock("POST", "/posts/_search")
        .with_status(503)
        .with_body(r#"{"error":{"type":"unavailable_shards_exception"},"status":503}"#)
        .expect(3)
        .create_async()
        .await;

    let mut config = test_engine_config(&server.url());
    config.max_retries = 2;
    config.retry_backoff_secs = 0;
    let service = SearchService::new(config, &test_search_config());

    let err = service.search("k9s").await.unwrap_err();
    assert!(matches!(err, SearchError::Engine { status: 503, .. }));

    search.assert_async().await;
}
