//! Thread subcommand logic
//!
//! Crawls the conversation for each given post URL. Every unit of work
//! gets its own freshly bootstrapped session and its own failure boundary:
//! one URL failing to bootstrap or crawl is logged and skipped, the batch
//! continues.

use std::path::PathBuf;

use tracing::{error, info};

use crate::session::Bootstrapper;
use crate::sink::JsonLinesSink;
use crate::{Result, Settings, utils::version};

/// Arguments for the thread subcommand
#[derive(Debug, clap::Args)]
pub struct ThreadArgs {
    /// Post URL to crawl (repeatable)
    #[arg(long = "url", value_name = "URL")]
    pub urls: Vec<String>,

    /// File with one post URL per line (as written by `magpie links`)
    #[arg(long, value_name = "FILE")]
    pub urls_file: Option<PathBuf>,

    /// Dump file, one JSON object per result page
    #[arg(short, long, default_value = "threads.jsonl", value_name = "FILE")]
    pub output: PathBuf,
}

impl ThreadArgs {
    /// Collect the post URLs from flags and the optional URL file
    pub fn collect_urls(&self) -> anyhow::Result<Vec<String>> {
        let mut urls = self.urls.clone();

        if let Some(path) = &self.urls_file {
            let contents = std::fs::read_to_string(path)?;
            urls.extend(
                contents
                    .lines()
                    .map(str::trim)
                    .filter(|line| !line.is_empty())
                    .map(String::from),
            );
        }

        if urls.is_empty() {
            anyhow::bail!("no post URLs given; use --url or --urls-file");
        }
        Ok(urls)
    }
}

/// Run the thread subcommand
pub async fn run_thread(settings: &Settings, args: ThreadArgs) -> anyhow::Result<()> {
    info!("magpie v{} starting thread crawl", version::get_version());

    let urls = args.collect_urls()?;
    let sink = JsonLinesSink::new(&args.output);

    for (index, url) in urls.iter().enumerate() {
        if index > 0 {
            tokio::time::sleep(settings.interval()).await;
        }

        match crawl_one(settings, url, &sink).await {
            Ok(pages) => info!("crawled {} ({} pages)", url, pages),
            Err(e) => error!("fail to crawl {}: {}", url, e),
        }
    }

    info!(
        "thread crawl finished, {} URL(s) processed into {:?}",
        urls.len(),
        args.output
    );
    Ok(())
}

/// One unit of work: fresh session, one conversation crawl
async fn crawl_one(settings: &Settings, url: &str, sink: &JsonLinesSink) -> Result<usize> {
    let session = Bootstrapper::new(settings).bootstrap().await?;
    session.conversation(url, sink).await
}
