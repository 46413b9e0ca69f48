//! Session establishment for the crawler
//!
//! This module owns the ephemeral credential handshake against the
//! platform's web surface and the resulting [`Session`] every fetch
//! operation runs on.

pub mod bootstrap;
pub mod credentials;

pub use bootstrap::{API_BASE, Bootstrapper, Session, WEB_BASE};
pub use credentials::{CredentialExtractor, Credentials, PatternExtractor, generate_csrf_token};
