//! The two fetch operations: adaptive search and conversation timeline
//!
//! Both are thin specializations of the shared cursor loop: same fixed
//! argument table, same header set, different endpoint, referer and extra
//! arguments.

use std::sync::LazyLock;

use regex::Regex;
use tracing::info;

use crate::fetch::pager::follow_cursors;
use crate::query::SearchSpec;
use crate::session::Session;
use crate::sink::PageSink;
use crate::{Error, Result};

/// Fixed argument table both endpoints require. The platform rejects or
/// degrades responses without these feature flags; the set is a literal
/// copy of what the web client sends.
pub const BASE_QUERY_ARGS: &[(&str, &str)] = &[
    ("include_profile_interstitial_type", "1"),
    ("include_blocking", "1"),
    ("include_blocked_by", "1"),
    ("include_followed_by", "1"),
    ("include_want_retweets", "1"),
    ("include_mute_edge", "1"),
    ("include_can_dm", "1"),
    ("include_can_media_tag", "1"),
    ("skip_status", "1"),
    ("cards_platform", "Web-12"),
    ("include_cards", "1"),
    ("include_ext_alt_text", "true"),
    ("include_quote_count", "true"),
    ("include_reply_count", "1"),
    ("tweet_mode", "extended"),
    ("include_entities", "true"),
    ("include_user_entities", "true"),
    ("include_ext_media_color", "true"),
    ("include_ext_media_availability", "true"),
    ("send_error_codes", "true"),
    ("simple_quoted_tweet", "true"),
    ("referrer", "tweet"),
    ("count", "20"),
    ("include_ext_has_birdwatch_notes", "false"),
    ("ext", "mediaStats,highlightedLabel"),
];

static POST_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/status/([^/?]+)").expect("post id pattern compiles"));

/// Pull the post id out of a post URL's `/status/<id>` path segment
pub fn post_id_from_url(post_url: &str) -> Result<String> {
    POST_ID_RE
        .captures(post_url)
        .map(|caps| caps[1].to_string())
        .ok_or_else(|| Error::page_fetch(format!("no /status/<id> segment in {:?}", post_url)))
}

impl Session {
    /// Run a paginated search for the given spec, delivering every page to
    /// `sink`. Returns the number of pages delivered; failures stop the
    /// loop but are not propagated.
    pub async fn search(&self, spec: &SearchSpec, sink: &dyn PageSink) -> usize {
        self.search_query(&spec.build_query(), sink).await
    }

    /// Run a paginated search for an already-rendered query string
    pub async fn search_query(&self, query: &str, sink: &dyn PageSink) -> usize {
        let endpoint = self
            .web_base()
            .join("i/api/2/search/adaptive.json")
            .expect("search endpoint URL parses");
        let referer = self
            .web_base()
            .join("search")
            .expect("search referer URL parses");

        info!("searching for {:?}", query);
        follow_cursors(
            self,
            &endpoint,
            BASE_QUERY_ARGS,
            &[("q", query)],
            referer.as_str(),
            sink,
        )
        .await
    }

    /// Crawl the conversation thread of one post, delivering every page to
    /// `sink`. Fails only when no post id can be derived from the URL;
    /// fetch failures stop the loop without propagating.
    pub async fn conversation(&self, post_url: &str, sink: &dyn PageSink) -> Result<usize> {
        let post_id = post_id_from_url(post_url)?;
        let endpoint = self
            .web_base()
            .join(&format!("i/api/2/timeline/conversation/{}.json", post_id))?;

        info!("crawling conversation {}", post_id);
        Ok(follow_cursors(self, &endpoint, BASE_QUERY_ARGS, &[], post_url, sink).await)
    }
}
