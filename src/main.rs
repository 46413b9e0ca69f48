//! magpie binary: crawl Twitter's internal web API from the command line
//!
//! # Usage
//!
//! ```bash
//! magpie search --from HazelCurry2000 --min-replies 1 -o search.jsonl
//! magpie links -i search.jsonl -o post_urls.txt
//! magpie thread --urls-file post_urls.txt -o threads.jsonl
//! magpie report -i threads.jsonl -o report.tsv
//! ```
//!
//! Data goes to the output files; logs go to stderr.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use magpie::cli::{LinksArgs, ReportArgs, SearchArgs, ThreadArgs};
use magpie::config::ConfigLoader;

/// Crawler for Twitter's internal web API
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(name = "magpie")]
struct Cli {
    /// Configuration file (defaults to <config dir>/magpie/config.toml)
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Per-request timeout in seconds
    #[arg(long, global = true, value_name = "SECONDS")]
    timeout: Option<u64>,

    /// Sleep between result pages in seconds
    #[arg(long, global = true, value_name = "SECONDS")]
    interval: Option<u64>,

    /// Proxy server URL (http://host:port, socks5://host:port, etc.)
    #[arg(long, global = true, value_name = "URL")]
    proxy: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run a paginated search and dump result pages
    Search(SearchArgs),
    /// Crawl conversation threads for one or more post URLs
    Thread(ThreadArgs),
    /// Derive post URLs from a search dump
    Links(LinksArgs),
    /// Join a conversation dump into a tab-separated report
    Report(ReportArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logs to stderr so dumps piped from stdout stay clean
    let default_filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Configuration precedence: CLI flags > env > file > defaults
    let mut settings = ConfigLoader::new().load(cli.config.as_deref())?;
    if let Some(timeout) = cli.timeout {
        settings.network.timeout_secs = timeout;
    }
    if let Some(interval) = cli.interval {
        settings.crawl.interval_secs = interval;
    }
    if let Some(proxy) = cli.proxy {
        settings.network.https_proxy = Some(proxy);
    }
    settings.validate()?;

    match cli.command {
        Command::Search(args) => magpie::cli::run_search(&settings, args).await,
        Command::Thread(args) => magpie::cli::run_thread(&settings, args).await,
        Command::Links(args) => magpie::cli::run_links(args),
        Command::Report(args) => magpie::cli::run_report(args),
    }
}
