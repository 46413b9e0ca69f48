//! Common test utilities and helpers
//!
//! Fixture builders and mock mounting shared by the integration tests.

#![allow(dead_code)]

use serde_json::{Value, json};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use magpie::config::Settings;
use magpie::session::{Bootstrapper, Session};

/// Guest token planted on the fixture landing page
pub const LANDING_GUEST_TOKEN: &str = "1402444682223751169";

/// Guest token returned by the fixture activation endpoint
pub const ACTIVATED_GUEST_TOKEN: &str = "1402444699999999999";

/// Bearer literal planted in the fixture bundle
pub const BEARER_TOKEN: &str = "AAAAAAAAfixture%3DtokenXyz";

/// Path of the fixture web-client bundle
pub const BUNDLE_PATH: &str = "/responsive-web/client-web/main.ca936b25.js";

/// Landing page markup carrying the guest-token literal and the bundle
/// script reference
pub fn landing_page(base: &str) -> String {
    format!(
        concat!(
            "<html><head>",
            "<script>document.cookie = decodeURIComponent(\"gt={gt}; Max-Age=10800; ",
            "Domain=.twitter.com; Path=/; Secure\");</script>",
            "<script src=\"{base}{bundle}\"></script>",
            "</head><body></body></html>",
        ),
        gt = LANDING_GUEST_TOKEN,
        base = base,
        bundle = BUNDLE_PATH,
    )
}

/// Minified-bundle fragment carrying the bearer literal
pub fn bundle_js() -> String {
    format!("var a={{}};a.s=\"{}\",a.t=1;", BEARER_TOKEN)
}

/// Settings tuned for tests: no inter-page sleep
pub fn test_settings() -> Settings {
    let mut settings = Settings::default();
    settings.crawl.interval_secs = 0;
    settings
}

/// Mount the full handshake surface on a mock server
pub async fn mount_handshake(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(landing_page(&server.uri())))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path(BUNDLE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string(bundle_js()))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/i/js_inst"))
        .respond_with(ResponseTemplate::new(200))
        .mount(server)
        .await;

    Mock::given(method("POST"))
        .and(path("/1.1/guest/activate.json"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "guest_token": ACTIVATED_GUEST_TOKEN })),
        )
        .mount(server)
        .await;
}

/// Bootstrap a session against a mock server carrying the handshake mounts
pub async fn session_for(server: &MockServer) -> Session {
    let base = url::Url::parse(&server.uri()).unwrap();
    Bootstrapper::new(&test_settings())
        .with_web_base(base.clone())
        .with_api_base(base)
        .bootstrap()
        .await
        .expect("fixture bootstrap succeeds")
}

/// One result-page body: a single user/post pair and, optionally, a
/// trailing continuation cursor
pub fn page_body(user_id: &str, post_id: &str, cursor: Option<&str>) -> Value {
    let mut entries = vec![json!({ "content": { "item": { "id": post_id } } })];
    if let Some(cursor) = cursor {
        entries.push(json!({
            "content": {
                "operation": {
                    "cursor": { "value": cursor, "cursorType": "Bottom" }
                }
            }
        }));
    }

    json!({
        "globalObjects": {
            "users": {
                user_id: { "screen_name": format!("user_{}", user_id) }
            },
            "tweets": {
                post_id: {
                    "user_id_str": user_id,
                    "full_text": format!("post {}", post_id),
                    "created_at": "Mon Jan 01 00:00:00 +0000 2024",
                    "reply_count": 1,
                    "conversation_id_str": post_id
                }
            }
        },
        "timeline": {
            "instructions": [ { "addEntries": { "entries": entries } } ]
        }
    })
}
