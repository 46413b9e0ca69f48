//! Subcommand runners for the magpie binary

pub mod report;
pub mod search;
pub mod thread;

pub use report::{LinksArgs, ReportArgs, run_links, run_report};
pub use search::{SearchArgs, run_search};
pub use thread::{ThreadArgs, run_thread};
