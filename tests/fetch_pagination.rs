//! Pagination loop integration tests
//!
//! Exercises the cursor-following loop end-to-end against wiremock page
//! sequences: full chains, sink failures, malformed pages and transport
//! errors.

mod common;

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use magpie::sink::{MemorySink, PageSink};
use magpie::types::Page;

const SEARCH_PATH: &str = "/i/api/2/search/adaptive.json";

/// Sink that fails on every delivery but remembers how many it saw
#[derive(Default)]
struct GrumpySink {
    seen: AtomicUsize,
}

#[async_trait]
impl PageSink for GrumpySink {
    async fn accept(&self, _page: &Page) -> magpie::Result<()> {
        self.seen.fetch_add(1, Ordering::SeqCst);
        Err(magpie::Error::callback("grumpy by construction"))
    }
}

/// Mount a three-page search chain: the first page carries cursor `c2`,
/// the second `c3`, the third none.
async fn mount_search_chain(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path(SEARCH_PATH))
        .and(query_param("cursor", "c2"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(common::page_body("2", "200", Some("c3"))),
        )
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path(SEARCH_PATH))
        .and(query_param("cursor", "c3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(common::page_body("3", "300", None)))
        .mount(server)
        .await;

    // First page: no cursor argument yet; lowest priority so the
    // cursor-specific mounts win when one is present
    Mock::given(method("GET"))
        .and(path(SEARCH_PATH))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(common::page_body("1", "100", Some("c2"))),
        )
        .with_priority(10)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_search_follows_cursor_chain_in_order() {
    let server = MockServer::start().await;
    common::mount_handshake(&server).await;
    mount_search_chain(&server).await;

    let session = common::session_for(&server).await;
    let sink = MemorySink::new();

    let pages = session.search_query("(from:a)", &sink).await;
    assert_eq!(pages, 3);

    let delivered = sink.pages().await;
    assert_eq!(delivered.len(), 3);
    assert!(delivered[0].posts.contains_key("100"));
    assert!(delivered[1].posts.contains_key("200"));
    assert!(delivered[2].posts.contains_key("300"));
}

#[tokio::test]
async fn test_sink_failure_does_not_abort_the_loop() {
    let server = MockServer::start().await;
    common::mount_handshake(&server).await;
    mount_search_chain(&server).await;

    let session = common::session_for(&server).await;
    let sink = GrumpySink::default();

    let pages = session.search_query("(from:a)", &sink).await;

    // Every page was still fetched and offered to the sink
    assert_eq!(pages, 3);
    assert_eq!(sink.seen.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn test_malformed_page_stops_the_loop_silently() {
    let server = MockServer::start().await;
    common::mount_handshake(&server).await;

    // Second page has no globalObjects mapping
    Mock::given(method("GET"))
        .and(path(SEARCH_PATH))
        .and(query_param("cursor", "c2"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "timeline": { "instructions": [] } })),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(SEARCH_PATH))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(common::page_body("1", "100", Some("c2"))),
        )
        .with_priority(10)
        .mount(&server)
        .await;

    let session = common::session_for(&server).await;
    let sink = MemorySink::new();

    // No error escapes; the caller only sees fewer pages
    let pages = session.search_query("(from:a)", &sink).await;
    assert_eq!(pages, 1);
    assert_eq!(sink.len().await, 1);
}

#[tokio::test]
async fn test_transport_error_stops_the_loop_silently() {
    let server = MockServer::start().await;
    common::mount_handshake(&server).await;

    Mock::given(method("GET"))
        .and(path(SEARCH_PATH))
        .and(query_param("cursor", "c2"))
        .respond_with(ResponseTemplate::new(429))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(SEARCH_PATH))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(common::page_body("1", "100", Some("c2"))),
        )
        .with_priority(10)
        .mount(&server)
        .await;

    let session = common::session_for(&server).await;
    let sink = MemorySink::new();

    let pages = session.search_query("(from:a)", &sink).await;
    assert_eq!(pages, 1);
}

#[tokio::test]
async fn test_page_without_timeline_is_the_last_page() {
    let server = MockServer::start().await;
    common::mount_handshake(&server).await;

    Mock::given(method("GET"))
        .and(path(SEARCH_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "globalObjects": { "users": {}, "tweets": {} }
        })))
        .mount(&server)
        .await;

    let session = common::session_for(&server).await;
    let sink = MemorySink::new();

    // The page itself is still delivered; only the continuation stops
    let pages = session.search_query("(from:a)", &sink).await;
    assert_eq!(pages, 1);
    assert_eq!(sink.len().await, 1);
}

#[tokio::test]
async fn test_conversation_fetch_uses_derived_post_id() {
    let server = MockServer::start().await;
    common::mount_handshake(&server).await;

    Mock::given(method("GET"))
        .and(path("/i/api/2/timeline/conversation/12345.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(common::page_body("7", "12345", None)))
        .mount(&server)
        .await;

    let session = common::session_for(&server).await;
    let sink = MemorySink::new();

    let pages = session
        .conversation("https://platform/user/status/12345", &sink)
        .await
        .unwrap();

    assert_eq!(pages, 1);
    assert!(sink.pages().await[0].posts.contains_key("12345"));
}

#[tokio::test]
async fn test_conversation_rejects_url_without_post_id() {
    let server = MockServer::start().await;
    common::mount_handshake(&server).await;

    let session = common::session_for(&server).await;
    let sink = MemorySink::new();

    let err = session
        .conversation("https://twitter.com/just-a-profile", &sink)
        .await
        .unwrap_err();

    assert!(matches!(err, magpie::Error::PageFetch { .. }));
    assert!(sink.is_empty().await);
}
