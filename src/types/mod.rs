//! Type definitions for the crawler
//!
//! This module contains the record shapes shared between the fetch loop,
//! the page sinks and the report step.

pub mod records;

pub use records::{Entities, MediaRef, Page, PostRecord, UserRecord};
