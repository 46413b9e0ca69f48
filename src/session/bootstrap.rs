//! Session bootstrap: the multi-step handshake that turns an anonymous
//! HTTP client into a usable API session
//!
//! The sequence mirrors what the platform's own web client does on first
//! load: fetch the landing page, adopt the guest token it plants, pull the
//! bearer token out of the client bundle, self-issue a CSRF token, then ask
//! the activation endpoint for a fresh guest token. Only the last step is
//! allowed to fail without sinking the whole bootstrap.

use std::sync::Arc;
use std::time::Duration;

use reqwest::{Client, Proxy, cookie::Jar};
use tracing::{debug, info, warn};
use url::Url;

use crate::config::Settings;
use crate::session::credentials::{
    CredentialExtractor, Credentials, PatternExtractor, generate_csrf_token,
};
use crate::{Error, Result};

/// Default web origin
pub const WEB_BASE: &str = "https://twitter.com";

/// Default API origin
pub const API_BASE: &str = "https://api.twitter.com";

/// Browser identification presented on every request
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/91.0.4472.77 Safari/537.36";

/// Response of the guest activation endpoint
#[derive(Debug, serde::Deserialize)]
struct GuestActivation {
    guest_token: String,
}

/// A bootstrapped API session: configured transport plus the credential
/// triple. Immutable once established; dropped at the end of the run.
#[derive(Debug)]
pub struct Session {
    http: Client,
    credentials: Credentials,
    web_base: Url,
    api_base: Url,
    interval: Duration,
}

impl Session {
    /// HTTP client carrying the session cookie jar
    pub fn http(&self) -> &Client {
        &self.http
    }

    /// The credential triple
    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// Web origin the session was bootstrapped against
    pub fn web_base(&self) -> &Url {
        &self.web_base
    }

    /// API origin the session was bootstrapped against
    pub fn api_base(&self) -> &Url {
        &self.api_base
    }

    /// Sleep applied between result pages
    pub fn interval(&self) -> Duration {
        self.interval
    }
}

/// Performs the handshake that produces a [`Session`].
///
/// Generic over the [`CredentialExtractor`] so tests and future front-end
/// revisions can swap the scraping patterns without touching the handshake
/// order.
#[derive(Debug)]
pub struct Bootstrapper<E: CredentialExtractor = PatternExtractor> {
    settings: Settings,
    extractor: E,
    web_base: Url,
    api_base: Url,
}

impl Bootstrapper<PatternExtractor> {
    /// Create a bootstrapper with the pattern extractor keyed to the
    /// current front-end
    pub fn new(settings: &Settings) -> Self {
        Self::with_extractor(settings, PatternExtractor::new())
    }
}

impl<E: CredentialExtractor> Bootstrapper<E> {
    /// Create a bootstrapper with a custom credential extractor
    pub fn with_extractor(settings: &Settings, extractor: E) -> Self {
        Self {
            settings: settings.clone(),
            extractor,
            web_base: Url::parse(WEB_BASE).expect("web base URL parses"),
            api_base: Url::parse(API_BASE).expect("api base URL parses"),
        }
    }

    /// Override the web origin (test servers)
    pub fn with_web_base(mut self, web_base: Url) -> Self {
        self.web_base = web_base;
        self
    }

    /// Override the API origin (test servers)
    pub fn with_api_base(mut self, api_base: Url) -> Self {
        self.api_base = api_base;
        self
    }

    /// Run the handshake and return a usable session.
    ///
    /// Steps:
    /// 1. build the transport (browser UA, compression, optional proxy,
    ///    certificate verification per settings, shared cookie jar);
    /// 2. fetch the landing page and adopt its guest token (`gt` cookie);
    /// 3. fetch the web-client bundle and extract the bearer token;
    /// 4. self-issue the CSRF token (`ct0` cookie);
    /// 5. best-effort instrumentation warm-up, failures ignored;
    /// 6. activate the guest token; on failure keep the landing-page token.
    pub async fn bootstrap(&self) -> Result<Session> {
        let jar = Arc::new(Jar::default());
        let http = self.build_transport(&jar)?;

        // Landing page: guest token + bundle location
        let landing_url = self.web_base.clone();
        let landing_html = http
            .get(landing_url.clone())
            .send()
            .await
            .map_err(|e| Error::bootstrap(format!("landing page fetch: {}", e)))?
            .text()
            .await
            .map_err(|e| Error::bootstrap(format!("landing page body: {}", e)))?;

        let guest_token = self.extractor.guest_token(&landing_html)?;
        self.set_cookie(&jar, "gt", &guest_token);

        // Client bundle: bearer token
        let bundle_url = self.extractor.bundle_url(&landing_html, &landing_url)?;
        debug!("fetching web-client bundle {}", bundle_url);
        let bundle_js = http
            .get(bundle_url)
            .send()
            .await
            .map_err(|e| Error::credential_extraction(format!("bundle fetch: {}", e)))?
            .text()
            .await
            .map_err(|e| Error::credential_extraction(format!("bundle body: {}", e)))?;

        let authorization = format!("Bearer {}", self.extractor.bearer_token(&bundle_js)?);

        // CSRF token is ours to invent; the platform only checks that the
        // header and the ct0 cookie agree
        let csrf_token = generate_csrf_token();
        self.set_cookie(&jar, "ct0", &csrf_token);

        let mut credentials = Credentials {
            guest_token,
            authorization,
            csrf_token,
        };

        // Instrumentation warm-up, best effort
        let warmup_url = self.web_base.join("i/js_inst?c_name=ui_metrics")?;
        if let Err(e) = http.get(warmup_url).send().await {
            debug!("instrumentation warm-up failed: {}", e);
        }

        // Guest activation; later calls may still work with the
        // landing-page token, so a failure here only warns
        match self.activate_guest_token(&http, &credentials).await {
            Ok(activated) => {
                self.set_cookie(&jar, "gt", &activated);
                credentials.guest_token = activated;
            }
            Err(e) => warn!("fail to update guest token: {}", e),
        }

        info!("session bootstrapped against {}", self.web_base);
        Ok(Session {
            http,
            credentials,
            web_base: self.web_base.clone(),
            api_base: self.api_base.clone(),
            interval: self.settings.interval(),
        })
    }

    fn build_transport(&self, jar: &Arc<Jar>) -> Result<Client> {
        let mut builder = Client::builder()
            .user_agent(USER_AGENT)
            .cookie_provider(Arc::clone(jar))
            .timeout(self.settings.timeout())
            .danger_accept_invalid_certs(!self.settings.network.verify_tls);

        if let Some(proxy) = self.settings.get_proxy_url() {
            debug!("routing through proxy {}", proxy);
            builder = builder
                .proxy(Proxy::all(proxy).map_err(|e| {
                    Error::config(format!("proxy {}: {}", proxy, e))
                })?);
        }

        builder
            .build()
            .map_err(|e| Error::bootstrap(format!("transport setup: {}", e)))
    }

    /// Mirror a credential cookie for both origins. The platform scopes
    /// these with a `Domain=` attribute; setting the cookie per origin has
    /// the same effect and also covers host-scoped test servers.
    fn set_cookie(&self, jar: &Arc<Jar>, name: &str, value: &str) {
        let cookie = format!("{}={}", name, value);
        jar.add_cookie_str(&cookie, &self.web_base);
        if self.api_base != self.web_base {
            jar.add_cookie_str(&cookie, &self.api_base);
        }
    }

    async fn activate_guest_token(&self, http: &Client, credentials: &Credentials) -> Result<String> {
        let url = self.api_base.join("1.1/guest/activate.json")?;
        let headers = credentials.request_headers(self.web_base.as_str())?;

        let activation: GuestActivation = http
            .post(url)
            .headers(headers)
            .send()
            .await
            .map_err(|e| Error::guest_token_refresh(e.to_string()))?
            .error_for_status()
            .map_err(|e| Error::guest_token_refresh(e.to_string()))?
            .json()
            .await
            .map_err(|e| Error::guest_token_refresh(e.to_string()))?;

        Ok(activation.guest_token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_bases() {
        let bootstrapper = Bootstrapper::new(&Settings::default());
        assert_eq!(bootstrapper.web_base.as_str(), "https://twitter.com/");
        assert_eq!(bootstrapper.api_base.as_str(), "https://api.twitter.com/");
    }

    #[test]
    fn test_base_overrides() {
        let web = Url::parse("http://127.0.0.1:3999").unwrap();
        let bootstrapper = Bootstrapper::new(&Settings::default())
            .with_web_base(web.clone())
            .with_api_base(web.clone());

        assert_eq!(bootstrapper.web_base, web);
        assert_eq!(bootstrapper.api_base, web);
    }

    #[test]
    fn test_transport_rejects_bad_proxy() {
        let mut settings = Settings::default();
        settings.network.all_proxy = Some("::not-a-proxy::".to_string());

        let bootstrapper = Bootstrapper::new(&settings);
        let jar = Arc::new(Jar::default());
        assert!(bootstrapper.build_transport(&jar).is_err());
    }
}
