//! Configuration management for the crawler
//!
//! This module handles loading and managing configuration settings
//! for the crawl subcommands.

pub mod loader;
pub mod settings;

pub use loader::ConfigLoader;
pub use settings::Settings;
