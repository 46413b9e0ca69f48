//! Search subcommand logic

use std::path::PathBuf;

use chrono::NaiveDate;
use tracing::info;

use crate::query::SearchSpec;
use crate::session::Bootstrapper;
use crate::sink::JsonLinesSink;
use crate::{Settings, utils::version};

/// Arguments for the search subcommand
#[derive(Debug, clap::Args)]
pub struct SearchArgs {
    /// Require all of these terms (repeatable)
    #[arg(long = "contains", value_name = "TERM")]
    pub contains: Vec<String>,

    /// Require this exact phrase (spaces allowed)
    #[arg(long, value_name = "PHRASE")]
    pub exact_phrase: Option<String>,

    /// Require at least one of these terms (repeatable)
    #[arg(long = "any", value_name = "TERM")]
    pub contains_any: Vec<String>,

    /// Exclude these terms (repeatable)
    #[arg(long = "exclude", value_name = "TERM")]
    pub excludes: Vec<String>,

    /// Require one of these hashtags, without the leading # (repeatable)
    #[arg(long = "hashtag", value_name = "TAG")]
    pub hashtags: Vec<String>,

    /// Language filter
    #[arg(long, value_name = "LANG")]
    pub language: Option<String>,

    /// Posts authored by one of these accounts (repeatable)
    #[arg(long = "from", value_name = "ACCOUNT")]
    pub from_accounts: Vec<String>,

    /// Posts replying to one of these accounts (repeatable)
    #[arg(long = "to", value_name = "ACCOUNT")]
    pub to_accounts: Vec<String>,

    /// Posts mentioning one of these accounts (repeatable)
    #[arg(long = "mention", value_name = "ACCOUNT")]
    pub mention_accounts: Vec<String>,

    /// Minimum reply count
    #[arg(long, value_name = "N")]
    pub min_replies: Option<u32>,

    /// Minimum like count
    #[arg(long, value_name = "N")]
    pub min_faves: Option<u32>,

    /// Minimum retweet count
    #[arg(long, value_name = "N")]
    pub min_retweets: Option<u32>,

    /// Posts on or after this date (YYYY-MM-DD)
    #[arg(long, value_name = "DATE")]
    pub since: Option<NaiveDate>,

    /// Posts up to this date (YYYY-MM-DD)
    #[arg(long, value_name = "DATE")]
    pub until: Option<NaiveDate>,

    /// Dump file, one JSON object per result page
    #[arg(short, long, default_value = "search.jsonl", value_name = "FILE")]
    pub output: PathBuf,
}

impl SearchArgs {
    /// Assemble the structured spec from the flags
    pub fn to_spec(&self) -> SearchSpec {
        SearchSpec {
            contains: self.contains.clone(),
            exact_phrase: self.exact_phrase.clone(),
            contains_any: self.contains_any.clone(),
            excludes: self.excludes.clone(),
            hashtags: self.hashtags.clone(),
            language: self.language.clone(),
            from_accounts: self.from_accounts.clone(),
            to_accounts: self.to_accounts.clone(),
            mention_accounts: self.mention_accounts.clone(),
            min_replies: self.min_replies,
            min_faves: self.min_faves,
            min_retweets: self.min_retweets,
            since: self.since,
            until: self.until,
        }
    }
}

/// Run the search subcommand
pub async fn run_search(settings: &Settings, args: SearchArgs) -> anyhow::Result<()> {
    info!("magpie v{} starting search", version::get_version());

    let spec = args.to_spec();
    let session = Bootstrapper::new(settings).bootstrap().await?;

    let sink = JsonLinesSink::new(&args.output);
    let pages = session.search(&spec, &sink).await;

    info!("search finished, {} page(s) written to {:?}", pages, args.output);
    Ok(())
}
