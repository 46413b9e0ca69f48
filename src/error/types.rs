//! Error type definitions
//!
//! Defines the main error types used throughout the crawler.

use thiserror::Error;

/// Main error type for the crawler
#[derive(Error, Debug)]
pub enum Error {
    /// Session bootstrap errors; any handshake step failing before the
    /// credential triple is assembled
    #[error("Bootstrap failed: {step}")]
    Bootstrap { step: String },

    /// Credential scraping errors from the platform front-end; the
    /// bundle-parsing step most likely to break when the platform ships a
    /// new web client
    #[error("Credential extraction failed: {what}")]
    CredentialExtraction { what: String },

    /// Guest token activation errors; non-fatal, the token obtained from
    /// the landing page stays in effect
    #[error("Guest token refresh failed: {reason}")]
    GuestTokenRefresh { reason: String },

    /// Per-page fetch errors; terminates one pagination loop
    #[error("Page fetch failed: {reason}")]
    PageFetch { reason: String },

    /// Page sink errors; isolated per page, the loop continues
    #[error("Page callback failed: {reason}")]
    Callback { reason: String },

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Network/HTTP client errors
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// URL parsing errors
    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),

    /// Date/time parsing errors
    #[error("Date parsing error: {0}")]
    DateParse(#[from] chrono::ParseError),

    /// Generic errors
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a new bootstrap error
    pub fn bootstrap(step: impl Into<String>) -> Self {
        Self::Bootstrap { step: step.into() }
    }

    /// Create a credential extraction error
    pub fn credential_extraction(what: impl Into<String>) -> Self {
        Self::CredentialExtraction { what: what.into() }
    }

    /// Create a guest token refresh error
    pub fn guest_token_refresh(reason: impl Into<String>) -> Self {
        Self::GuestTokenRefresh {
            reason: reason.into(),
        }
    }

    /// Create a page fetch error
    pub fn page_fetch(reason: impl Into<String>) -> Self {
        Self::PageFetch {
            reason: reason.into(),
        }
    }

    /// Create a page callback error
    pub fn callback(reason: impl Into<String>) -> Self {
        Self::Callback {
            reason: reason.into(),
        }
    }

    /// Create a new configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a new internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Whether this error makes the session unusable.
    ///
    /// Covers both the generic handshake failures and the credential
    /// extraction kind; batch drivers skip the unit of work and move on.
    pub fn is_bootstrap_failure(&self) -> bool {
        matches!(
            self,
            Self::Bootstrap { .. } | Self::CredentialExtraction { .. }
        )
    }
}
