//! Links and report subcommand logic
//!
//! Both are offline joins over JSON-lines dumps; no network involved.

use std::path::{Path, PathBuf};

use tracing::info;

use crate::report;

/// Arguments for the links subcommand
#[derive(Debug, clap::Args)]
pub struct LinksArgs {
    /// Search dump to read
    #[arg(short, long, default_value = "search.jsonl", value_name = "FILE")]
    pub input: PathBuf,

    /// Post-URL list to write, one URL per line
    #[arg(short, long, default_value = "post_urls.txt", value_name = "FILE")]
    pub output: PathBuf,
}

/// Arguments for the report subcommand
#[derive(Debug, clap::Args)]
pub struct ReportArgs {
    /// Conversation dump to read
    #[arg(short, long, default_value = "threads.jsonl", value_name = "FILE")]
    pub input: PathBuf,

    /// Tab-separated report to write
    #[arg(short, long, default_value = "report.tsv", value_name = "FILE")]
    pub output: PathBuf,
}

/// Run the links subcommand: search dump in, post-URL list out
pub fn run_links(args: LinksArgs) -> anyhow::Result<()> {
    let pages = report::read_dump(&args.input)?;
    let urls = report::post_urls(&pages);

    write_lines(&args.output, &urls)?;
    info!("{} post URL(s) written to {:?}", urls.len(), args.output);
    Ok(())
}

/// Run the report subcommand: conversation dump in, TSV report out
pub fn run_report(args: ReportArgs) -> anyhow::Result<()> {
    let pages = report::read_dump(&args.input)?;
    let rows = report::report_rows(&pages);

    write_lines(&args.output, &rows)?;
    info!("{} report row(s) written to {:?}", rows.len(), args.output);
    Ok(())
}

fn write_lines(path: &Path, lines: &[String]) -> std::io::Result<()> {
    let mut contents = lines.join("\n");
    if !contents.is_empty() {
        contents.push('\n');
    }
    std::fs::write(path, contents)
}
