//! Credential material and its extraction from the platform front-end
//!
//! The platform hands out nothing through a documented channel: the guest
//! token is embedded in a cookie-setting script on the landing page, and the
//! application bearer token lives inside the minified web-client bundle.
//! Both are scraped with patterns keyed to the current front-end, isolated
//! behind [`CredentialExtractor`] so a platform change touches exactly one
//! implementation.

use rand::Rng;
use regex::Regex;
use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue, REFERER};
use scraper::{Html, Selector};
use url::Url;

use crate::{Error, Result};

/// Guest-token literal on the landing page:
/// `decodeURIComponent("gt=1402444682223751169; Max-Age=10800; ...")`
const GUEST_TOKEN_PATTERN: &str = r#"decodeURIComponent\("gt=(\d+); "#;

/// Bearer literal inside the web-client bundle: `s="AAAAAAAA..."`
const BEARER_PATTERN: &str = r#"s="(AAAAAAAA[^"]+)""#;

/// `<script src=".../responsive-web/client-web/main.<hash>.js">`
const BUNDLE_SELECTOR: &str = r#"[src*="/responsive-web/client-web/main."]"#;

/// The ephemeral credential triple a bootstrapped session carries
#[derive(Debug, Clone)]
pub struct Credentials {
    /// Guest token; numeric-looking, issued by the platform
    pub guest_token: String,
    /// `Bearer `-prefixed application token scraped from the bundle
    pub authorization: String,
    /// Locally generated 32-character lowercase-hex CSRF token, mirrored
    /// into the `ct0` cookie
    pub csrf_token: String,
}

impl Credentials {
    /// Build the header set every API call carries.
    ///
    /// The CSRF token is double-submitted: once here and once as the `ct0`
    /// cookie the session jar replays.
    pub fn request_headers(&self, referer: &str) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, header_value(&self.authorization)?);
        headers.insert(REFERER, header_value(referer)?);
        headers.insert(ACCEPT, HeaderValue::from_static("*/*"));
        headers.insert("x-guest-token", header_value(&self.guest_token)?);
        headers.insert("x-csrf-token", header_value(&self.csrf_token)?);
        headers.insert("x-twitter-active-user", HeaderValue::from_static("no"));
        headers.insert(
            "x-twitter-client-language",
            HeaderValue::from_static("en-us"),
        );
        Ok(headers)
    }
}

fn header_value(value: &str) -> Result<HeaderValue> {
    HeaderValue::from_str(value)
        .map_err(|e| Error::internal(format!("invalid header value {:?}: {}", value, e)))
}

/// Generate the 32-character lowercase-hex CSRF token locally
pub fn generate_csrf_token() -> String {
    const HEX: &[u8; 16] = b"0123456789abcdef";

    let mut rng = rand::rng();
    (0..32).map(|_| HEX[rng.random_range(0..16)] as char).collect()
}

/// Scraping seam for the two front-end-embedded credentials
pub trait CredentialExtractor: Send + Sync {
    /// Pull the guest token out of the landing page markup
    fn guest_token(&self, landing_html: &str) -> Result<String>;

    /// Locate the main web-client bundle referenced by the landing page,
    /// resolved against the landing URL when the `src` is relative
    fn bundle_url(&self, landing_html: &str, landing_url: &Url) -> Result<Url>;

    /// Pull the bearer token out of the bundle script
    fn bearer_token(&self, bundle_js: &str) -> Result<String>;
}

/// [`CredentialExtractor`] keyed to the currently known front-end patterns
#[derive(Debug)]
pub struct PatternExtractor {
    guest_token_re: Regex,
    bearer_re: Regex,
    bundle_selector: Selector,
}

impl PatternExtractor {
    pub fn new() -> Self {
        Self {
            guest_token_re: Regex::new(GUEST_TOKEN_PATTERN).expect("guest token pattern compiles"),
            bearer_re: Regex::new(BEARER_PATTERN).expect("bearer pattern compiles"),
            bundle_selector: Selector::parse(BUNDLE_SELECTOR).expect("bundle selector parses"),
        }
    }
}

impl Default for PatternExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl CredentialExtractor for PatternExtractor {
    fn guest_token(&self, landing_html: &str) -> Result<String> {
        self.guest_token_re
            .captures(landing_html)
            .map(|caps| caps[1].to_string())
            .ok_or_else(|| Error::bootstrap("guest token literal not found in landing page"))
    }

    fn bundle_url(&self, landing_html: &str, landing_url: &Url) -> Result<Url> {
        let document = Html::parse_document(landing_html);
        let src = document
            .select(&self.bundle_selector)
            .next()
            .and_then(|node| node.value().attr("src"))
            .ok_or_else(|| {
                Error::credential_extraction("web-client bundle script not found in landing page")
            })?;

        landing_url.join(src).map_err(|e| {
            Error::credential_extraction(format!("bundle script URL {:?}: {}", src, e))
        })
    }

    fn bearer_token(&self, bundle_js: &str) -> Result<String> {
        self.bearer_re
            .captures(bundle_js)
            .map(|caps| caps[1].to_string())
            .ok_or_else(|| Error::credential_extraction("bearer literal not found in bundle"))
    }
}
