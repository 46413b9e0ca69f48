//! Paginated fetching against the platform's query endpoints
//!
//! [`pager`] owns the generic cursor-following loop; [`endpoints`]
//! specializes it into the search and conversation operations exposed on
//! [`crate::session::Session`].

pub mod endpoints;
pub mod pager;

pub use endpoints::{BASE_QUERY_ARGS, post_id_from_url};
pub use pager::follow_cursors;
