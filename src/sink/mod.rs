//! Page sinks: where fetched pages go
//!
//! The fetch loop hands every decoded page to a [`PageSink`] before
//! requesting the next one, so delivery is in page order and at-least-once
//! for every page actually fetched. Sink failures are the sink's problem:
//! the loop logs them and keeps going, one bad page must not lose the rest.

use async_trait::async_trait;
use std::path::PathBuf;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

use crate::types::Page;
use crate::{Error, Result};

/// Consumer of fetched pages
#[async_trait]
pub trait PageSink: Send + Sync {
    /// Take ownership-equivalent delivery of one page. Called once per
    /// fetched page, in order, before the next page is requested.
    async fn accept(&self, page: &Page) -> Result<()>;
}

/// Appends each page as one JSON object per line to a file.
///
/// The dump format matches the raw payload vocabulary (`users`/`tweets`
/// keys), so files written here feed straight into the report step.
#[derive(Debug)]
pub struct JsonLinesSink {
    path: PathBuf,
}

impl JsonLinesSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl PageSink for JsonLinesSink {
    async fn accept(&self, page: &Page) -> Result<()> {
        let mut line = serde_json::to_string(page)
            .map_err(|e| Error::callback(format!("serialize page: {}", e)))?;
        line.push('\n');

        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await
            .map_err(|e| Error::callback(format!("open {:?}: {}", self.path, e)))?;
        file.write_all(line.as_bytes())
            .await
            .map_err(|e| Error::callback(format!("append to {:?}: {}", self.path, e)))?;
        file.flush()
            .await
            .map_err(|e| Error::callback(format!("flush {:?}: {}", self.path, e)))?;

        Ok(())
    }
}

/// Collects pages in memory; for tests and small embedded crawls
///
/// # Examples
///
/// ```rust
/// use magpie::sink::MemorySink;
///
/// # tokio_test::block_on(async {
/// let sink = MemorySink::new();
/// assert!(sink.is_empty().await);
/// # });
/// ```
#[derive(Debug, Default)]
pub struct MemorySink {
    pages: Mutex<Vec<Page>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the pages delivered so far, in delivery order
    pub async fn pages(&self) -> Vec<Page> {
        self.pages.lock().await.clone()
    }

    /// Number of pages delivered so far
    pub async fn len(&self) -> usize {
        self.pages.lock().await.len()
    }

    /// Whether nothing has been delivered yet
    pub async fn is_empty(&self) -> bool {
        self.pages.lock().await.is_empty()
    }
}

#[async_trait]
impl PageSink for MemorySink {
    async fn accept(&self, page: &Page) -> Result<()> {
        self.pages.lock().await.push(page.clone());
        Ok(())
    }
}

/// Discards every page
#[derive(Debug, Default)]
pub struct NoopSink;

#[async_trait]
impl PageSink for NoopSink {
    async fn accept(&self, _page: &Page) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn sample_page() -> Page {
        let body = serde_json::json!({
            "globalObjects": {
                "users": {
                    "7": { "screen_name": "somebody" }
                },
                "tweets": {
                    "42": {
                        "user_id_str": "7",
                        "full_text": "hello",
                        "created_at": "Mon Jan 01 00:00:00 +0000 2024"
                    }
                }
            }
        });
        Page::from_response(&body).unwrap()
    }

    #[tokio::test]
    async fn test_json_lines_sink_appends() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dump.jsonl");
        let sink = JsonLinesSink::new(&path);

        sink.accept(&sample_page()).await.unwrap();
        sink.accept(&sample_page()).await.unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 2);

        let parsed: Page = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(parsed.posts["42"].full_text, "hello");
    }

    #[tokio::test]
    async fn test_json_lines_sink_unwritable_path() {
        let sink = JsonLinesSink::new("/nonexistent-dir/dump.jsonl");

        let err = sink.accept(&sample_page()).await.unwrap_err();
        assert!(matches!(err, Error::Callback { .. }));
    }

    #[tokio::test]
    async fn test_memory_sink_collects_in_order() {
        let sink = MemorySink::new();
        assert!(sink.is_empty().await);

        let mut first = sample_page();
        let extra = first.posts["42"].clone();
        first.posts.insert("43".to_string(), extra);
        sink.accept(&first).await.unwrap();
        sink.accept(&sample_page()).await.unwrap();

        let pages = sink.pages().await;
        assert_eq!(pages.len(), 2);
        assert_eq!(pages[0].posts.len(), 2);
        assert_eq!(pages[1].posts.len(), 1);
    }

    #[tokio::test]
    async fn test_noop_sink_accepts() {
        let sink = NoopSink;
        let mut page = sample_page();
        page.users = HashMap::new();
        assert!(sink.accept(&page).await.is_ok());
    }
}
