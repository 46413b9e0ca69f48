//! Batch post-processing of crawl dumps
//!
//! Joins JSON-lines dumps back into derived artifacts: the post-URL list
//! that feeds the conversation crawl, and the final tab-separated report.
//! Pure functions over [`Page`] values; all file handling stays in the CLI
//! except for the dump reader.

use std::collections::HashMap;
use std::path::Path;

use tracing::warn;

use crate::types::Page;
use crate::{Error, Result};

/// One row of the conversation report, joined from a post and its
/// conversation root
#[derive(Debug, Clone)]
struct ConversationRef {
    url: String,
    image_url: String,
    reply_count: u64,
}

/// Read a JSON-lines dump back into pages, in file order
pub fn read_dump(path: &Path) -> Result<Vec<Page>> {
    let contents = std::fs::read_to_string(path)?;

    contents
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(index, line)| {
            serde_json::from_str(line).map_err(|e| {
                Error::internal(format!("dump {:?} line {}: {}", path, index + 1, e))
            })
        })
        .collect()
}

/// Derive the post URLs contained in a search dump.
///
/// Post ids are emitted in sorted order per page so repeated runs produce
/// identical lists. Posts whose author is missing from the page's user
/// mapping are skipped with a warning.
pub fn post_urls(pages: &[Page]) -> Vec<String> {
    let mut urls = Vec::new();

    for page in pages {
        for post_id in sorted_post_ids(page) {
            let post = &page.posts[post_id];
            match page.screen_name(&post.user_id_str) {
                Some(screen_name) => {
                    urls.push(format!(
                        "https://twitter.com/{}/status/{}",
                        screen_name, post_id
                    ));
                }
                None => warn!("post {} has no author record, skipping", post_id),
            }
        }
    }

    urls
}

/// Join a conversation dump into tab-separated report rows.
///
/// Columns: author, creation time, flattened text, first media URL, and
/// the conversation root's URL, media URL and reply count (empty when the
/// root was not crawled).
pub fn report_rows(pages: &[Page]) -> Vec<String> {
    // Users and conversation roots are resolved across the whole dump:
    // a reply's author or root often arrives on a different page
    let mut users: HashMap<&str, &str> = HashMap::new();
    for page in pages {
        for (user_id, user) in &page.users {
            users.insert(user_id.as_str(), user.screen_name.as_str());
        }
    }

    let mut conversations: HashMap<&str, ConversationRef> = HashMap::new();
    for page in pages {
        for (post_id, post) in &page.posts {
            let Some(screen_name) = users.get(post.user_id_str.as_str()) else {
                continue;
            };
            conversations.insert(
                post_id.as_str(),
                ConversationRef {
                    url: format!("https://twitter.com/{}/status/{}", screen_name, post_id),
                    image_url: post.first_media_url().unwrap_or_default().to_string(),
                    reply_count: post.reply_count,
                },
            );
        }
    }

    let mut rows = Vec::new();
    for page in pages {
        for post_id in sorted_post_ids(page) {
            let post = &page.posts[post_id];
            let Some(screen_name) = users.get(post.user_id_str.as_str()) else {
                warn!("post {} has no author record, skipping", post_id);
                continue;
            };

            let conversation = post
                .conversation_id_str
                .as_deref()
                .and_then(|id| conversations.get(id));

            let row = [
                screen_name.to_string(),
                post.created_at.clone(),
                flatten_text(&post.full_text),
                post.first_media_url().unwrap_or_default().to_string(),
                conversation.map(|c| c.url.clone()).unwrap_or_default(),
                conversation
                    .map(|c| c.image_url.clone())
                    .unwrap_or_default(),
                conversation
                    .map(|c| c.reply_count.to_string())
                    .unwrap_or_default(),
            ];
            rows.push(row.join("\t"));
        }
    }

    rows
}

/// Page-local post ids, sorted numerically where possible
fn sorted_post_ids(page: &Page) -> Vec<&str> {
    let mut ids: Vec<&str> = page.posts.keys().map(String::as_str).collect();
    ids.sort_unstable_by(|a, b| match (a.parse::<u64>(), b.parse::<u64>()) {
        (Ok(x), Ok(y)) => x.cmp(&y),
        _ => a.cmp(b),
    });
    ids
}

/// Collapse newlines and tabs so the text fits one TSV cell
fn flatten_text(text: &str) -> String {
    text.replace(['\n', '\t'], " ").trim().to_string()
}
