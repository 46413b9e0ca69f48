//! Record shapes for crawled users and posts
//!
//! One fetch response carries two id-keyed mappings under `globalObjects`;
//! these are their typed forms. Field names follow the wire format so dumps
//! stay readable by tooling written against raw platform payloads.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// A user as it appears in a result page's `users` mapping
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRecord {
    /// Handle, without the leading `@`
    pub screen_name: String,

    /// Display name
    #[serde(default)]
    pub name: Option<String>,
}

/// A post as it appears in a result page's `tweets` mapping
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostRecord {
    /// Author's user id
    pub user_id_str: String,

    /// Post text
    pub full_text: String,

    /// Creation time, in the platform's own format
    /// (`Wed Oct 10 20:19:24 +0000 2018`)
    pub created_at: String,

    #[serde(default)]
    pub reply_count: u64,

    #[serde(default)]
    pub favorite_count: u64,

    #[serde(default)]
    pub retweet_count: u64,

    /// Id of the conversation root this post belongs to
    #[serde(default)]
    pub conversation_id_str: Option<String>,

    /// Entity annotations; only media references are consumed downstream
    #[serde(default)]
    pub entities: Entities,
}

/// Entity annotations attached to a post
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Entities {
    #[serde(default)]
    pub media: Vec<MediaRef>,
}

/// A single media attachment reference
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaRef {
    /// Direct URL of the media asset
    pub media_url: String,
}

/// One page of crawl results: the normalized `{users, posts}` payload
/// handed to the page sink.
///
/// Posts serialize under the platform's `tweets` key so JSON-lines dumps
/// match the raw payload vocabulary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page {
    pub users: HashMap<String, UserRecord>,
    #[serde(rename = "tweets")]
    pub posts: HashMap<String, PostRecord>,
}

impl Page {
    /// Decode a page from a raw response body.
    ///
    /// Both mappings must be present under `globalObjects`; a missing or
    /// misshapen mapping is a fetch failure with the decode diagnostic as
    /// the reason, never a silently empty page.
    pub fn from_response(body: &Value) -> crate::Result<Self> {
        let global = body
            .get("globalObjects")
            .ok_or_else(|| crate::Error::page_fetch("response has no globalObjects"))?;

        serde_json::from_value(global.clone())
            .map_err(|e| crate::Error::page_fetch(format!("globalObjects decode: {}", e)))
    }

    /// Look up the screen name for a post's author
    pub fn screen_name(&self, user_id: &str) -> Option<&str> {
        self.users.get(user_id).map(|u| u.screen_name.as_str())
    }
}

impl PostRecord {
    /// URL of the first media attachment, if any
    pub fn first_media_url(&self) -> Option<&str> {
        self.entities.media.first().map(|m| m.media_url.as_str())
    }
}
