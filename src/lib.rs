//! magpie - a crawler for Twitter's internal web API
//!
//! Bootstraps an unauthenticated ("guest") API session by scraping the
//! ephemeral credentials the platform's own web client uses, then drives
//! cursor-based pagination against the adaptive-search and
//! conversation-timeline endpoints, delivering each normalized result page
//! to a caller-supplied sink.
//!
//! # Architecture
//!
//! - **Session bootstrap**: landing page → guest token, client bundle →
//!   bearer token, locally generated CSRF token, guest activation.
//! - **Query builder**: [`SearchSpec`] renders the platform's boolean
//!   query mini-language.
//! - **Paginated fetcher**: one cursor-following loop shared by both
//!   endpoints; every failure downgrades to "stop producing pages".
//!
//! # Examples
//!
//! ```no_run
//! use magpie::{Bootstrapper, SearchSpec, Settings, sink::JsonLinesSink};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let settings = Settings::default();
//! let session = Bootstrapper::new(&settings).bootstrap().await?;
//!
//! let spec = SearchSpec::new()
//!     .with_from_accounts(["NASA"])
//!     .with_min_replies(1);
//!
//! let sink = JsonLinesSink::new("search.jsonl");
//! let pages = session.search(&spec, &sink).await;
//! println!("{} page(s) fetched", pages);
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod fetch;
pub mod query;
pub mod report;
pub mod session;
pub mod sink;
pub mod types;
pub mod utils;

pub use config::Settings;
pub use error::{Error, Result};
pub use query::SearchSpec;
pub use session::{Bootstrapper, Session};
pub use sink::PageSink;
pub use types::Page;
