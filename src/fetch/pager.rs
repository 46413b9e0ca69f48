//! The cursor-following pagination loop shared by both fetch operations
//!
//! Both endpoints paginate the same way: each page may carry an opaque
//! cursor buried in its trailing timeline instruction, and the next page is
//! requested by echoing that cursor back. There is no explicit last-page
//! flag; termination is the structural absence of a cursor.
//!
//! Every failure mode inside the loop downgrades to "stop producing pages":
//! a transport or decode error ends the loop, a sink error skips to the
//! next page, and the caller always sees a normal return carrying the
//! number of pages actually delivered.

use serde_json::Value;
use tracing::{debug, info, warn};
use url::Url;

use crate::Result;
use crate::session::Session;
use crate::sink::PageSink;
use crate::types::Page;

/// Outcome of scanning a page for its continuation cursor.
///
/// `NoTimeline` and `NoCursorEntry` terminate the loop identically; they
/// are distinguished so the logs can tell a front-end schema change from a
/// genuine end of results.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum CursorScan {
    /// Next-page cursor present
    Found(String),
    /// Timeline present but no trailing cursor entry: the normal last page
    NoCursorEntry,
    /// No timeline instruction structure at all: either an empty result or
    /// a response shape this crawler no longer understands
    NoTimeline,
}

/// Scan the trailing timeline-instruction structure for the next cursor:
/// `timeline.instructions[0].addEntries.entries[last].content.operation.cursor.value`
pub(crate) fn scan_cursor(body: &Value) -> CursorScan {
    let Some(instructions) = body
        .pointer("/timeline/instructions")
        .and_then(Value::as_array)
    else {
        return CursorScan::NoTimeline;
    };

    let cursor = instructions
        .first()
        .and_then(|instruction| instruction.pointer("/addEntries/entries"))
        .and_then(Value::as_array)
        .and_then(|entries| entries.last())
        .and_then(|entry| entry.pointer("/content/operation/cursor/value"))
        .and_then(Value::as_str);

    match cursor {
        Some(value) => CursorScan::Found(value.to_string()),
        None => CursorScan::NoCursorEntry,
    }
}

/// Assemble one page request URL: endpoint + fixed argument table +
/// endpoint-specific arguments + the cursor when present
fn page_url(
    endpoint: &Url,
    fixed_args: &[(&str, &str)],
    extra_args: &[(&str, &str)],
    cursor: Option<&str>,
) -> Url {
    let mut url = endpoint.clone();
    {
        let mut pairs = url.query_pairs_mut();
        for (key, value) in fixed_args {
            pairs.append_pair(key, value);
        }
        for (key, value) in extra_args {
            pairs.append_pair(key, value);
        }
        if let Some(cursor) = cursor {
            pairs.append_pair("cursor", cursor);
        }
    }
    url
}

async fn fetch_page(session: &Session, url: Url, referer: &str) -> Result<(Page, CursorScan)> {
    let headers = session.credentials().request_headers(referer)?;

    let body: Value = session
        .http()
        .get(url)
        .headers(headers)
        .send()
        .await?
        .error_for_status()?
        .json()
        .await?;

    let page = Page::from_response(&body)?;
    let scan = scan_cursor(&body);
    Ok((page, scan))
}

/// Drive the pagination loop to completion.
///
/// Delivers each page to `sink` before requesting the next, sleeping the
/// session interval between pages. Returns the number of pages delivered;
/// a premature stop is indistinguishable from a short result set except in
/// the logs.
pub async fn follow_cursors(
    session: &Session,
    endpoint: &Url,
    fixed_args: &[(&str, &str)],
    extra_args: &[(&str, &str)],
    referer: &str,
    sink: &dyn PageSink,
) -> usize {
    let mut cursor: Option<String> = None;
    let mut pages = 0usize;

    loop {
        let url = page_url(endpoint, fixed_args, extra_args, cursor.as_deref());
        debug!("fetching page {} of {}", pages + 1, endpoint.path());

        let (page, scan) = match fetch_page(session, url, referer).await {
            Ok(result) => result,
            Err(e) => {
                warn!("fail to fetch page: {}", e);
                break;
            }
        };

        pages += 1;
        if let Err(e) = sink.accept(&page).await {
            warn!("fail to exec callback: {}", e);
        }

        match scan {
            CursorScan::Found(next) => {
                cursor = Some(next);
                tokio::time::sleep(session.interval()).await;
            }
            CursorScan::NoCursorEntry => {
                info!("last page reached");
                break;
            }
            CursorScan::NoTimeline => {
                info!("no timeline instructions in response, treating as last page");
                break;
            }
        }
    }

    info!("fetch done, {} page(s) delivered", pages);
    pages
}
