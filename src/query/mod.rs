//! Search specification and query-string assembly
//!
//! The search endpoint takes one `q` argument written in the platform's
//! boolean mini-language. [`SearchSpec`] is the structured form;
//! [`SearchSpec::build_query`] renders it. Rendering is pure and clause
//! order is fixed, so identical specs always produce identical queries.
//!
//! Rendered shape, by example:
//!
//! ```text
//! {w1 w2} "exact phrase" (a OR b) (-x -y) (#h1 OR #h2)
//! (from:u1 OR from:u2) (to:u1) (@u1) min_replies:1 min_faves:2
//! min_retweets:3 since:2006-11-22 until:2006-12-19
//! ```

use chrono::NaiveDate;

/// Structured search filters; every field optional. An empty spec renders
/// to an empty query, which the platform treats as unconstrained.
#[derive(Debug, Clone, Default)]
pub struct SearchSpec {
    /// Posts containing all of these terms
    pub contains: Vec<String>,
    /// Posts containing this exact phrase (spaces allowed)
    pub exact_phrase: Option<String>,
    /// Posts containing at least one of these terms
    pub contains_any: Vec<String>,
    /// Posts containing none of these terms
    pub excludes: Vec<String>,
    /// Posts carrying at least one of these hashtags (without `#`)
    pub hashtags: Vec<String>,
    /// Language filter; accepted but not rendered
    pub language: Option<String>,
    /// Posts authored by any of these accounts
    pub from_accounts: Vec<String>,
    /// Posts replying to any of these accounts
    pub to_accounts: Vec<String>,
    /// Posts mentioning any of these accounts
    pub mention_accounts: Vec<String>,
    /// Minimum reply count
    pub min_replies: Option<u32>,
    /// Minimum like count
    pub min_faves: Option<u32>,
    /// Minimum retweet count
    pub min_retweets: Option<u32>,
    /// Posts from this date onwards
    pub since: Option<NaiveDate>,
    /// Posts up to this date
    pub until: Option<NaiveDate>,
}

impl SearchSpec {
    /// Create an empty (unconstrained) spec
    pub fn new() -> Self {
        Self::default()
    }

    /// Require all of these terms
    pub fn with_contains<I, S>(mut self, terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.contains = terms.into_iter().map(Into::into).collect();
        self
    }

    /// Require this exact phrase
    pub fn with_exact_phrase(mut self, phrase: impl Into<String>) -> Self {
        self.exact_phrase = Some(phrase.into());
        self
    }

    /// Require at least one of these terms
    pub fn with_contains_any<I, S>(mut self, terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.contains_any = terms.into_iter().map(Into::into).collect();
        self
    }

    /// Exclude all of these terms
    pub fn with_excludes<I, S>(mut self, terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.excludes = terms.into_iter().map(Into::into).collect();
        self
    }

    /// Require at least one of these hashtags
    pub fn with_hashtags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.hashtags = tags.into_iter().map(Into::into).collect();
        self
    }

    /// Set the language filter
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    /// Require one of these authors
    pub fn with_from_accounts<I, S>(mut self, accounts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.from_accounts = accounts.into_iter().map(Into::into).collect();
        self
    }

    /// Require one of these reply targets
    pub fn with_to_accounts<I, S>(mut self, accounts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.to_accounts = accounts.into_iter().map(Into::into).collect();
        self
    }

    /// Require a mention of one of these accounts
    pub fn with_mention_accounts<I, S>(mut self, accounts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.mention_accounts = accounts.into_iter().map(Into::into).collect();
        self
    }

    /// Set the minimum reply count
    pub fn with_min_replies(mut self, count: u32) -> Self {
        self.min_replies = Some(count);
        self
    }

    /// Set the minimum like count
    pub fn with_min_faves(mut self, count: u32) -> Self {
        self.min_faves = Some(count);
        self
    }

    /// Set the minimum retweet count
    pub fn with_min_retweets(mut self, count: u32) -> Self {
        self.min_retweets = Some(count);
        self
    }

    /// Only posts on or after this date
    pub fn with_since(mut self, date: NaiveDate) -> Self {
        self.since = Some(date);
        self
    }

    /// Only posts up to this date
    pub fn with_until(mut self, date: NaiveDate) -> Self {
        self.until = Some(date);
        self
    }

    /// Render the spec into the platform's query mini-language.
    ///
    /// Clauses append in fixed order; the result is trimmed, and an empty
    /// spec yields an empty string.
    pub fn build_query(&self) -> String {
        let mut q = String::new();

        if !self.contains.is_empty() {
            q.push_str(&format!(" {{{}}}", self.contains.join(" ")));
        }
        if let Some(phrase) = &self.exact_phrase {
            q.push_str(&format!(" \"{}\"", phrase));
        }
        if !self.contains_any.is_empty() {
            q.push_str(&format!(" ({})", self.contains_any.join(" OR ")));
        }
        if !self.excludes.is_empty() {
            let negated: Vec<String> = self.excludes.iter().map(|w| format!("-{}", w)).collect();
            q.push_str(&format!(" ({})", negated.join(" ")));
        }
        if !self.hashtags.is_empty() {
            let tagged: Vec<String> = self.hashtags.iter().map(|t| format!("#{}", t)).collect();
            q.push_str(&format!(" ({})", tagged.join(" OR ")));
        }
        if let Some(_language) = &self.language {
            // TODO: render a lang: clause once the endpoint accepts one
        }
        if !self.from_accounts.is_empty() {
            let from: Vec<String> = self
                .from_accounts
                .iter()
                .map(|a| format!("from:{}", a))
                .collect();
            q.push_str(&format!(" ({})", from.join(" OR ")));
        }
        if !self.to_accounts.is_empty() {
            let to: Vec<String> = self.to_accounts.iter().map(|a| format!("to:{}", a)).collect();
            q.push_str(&format!(" ({})", to.join(" OR ")));
        }
        if !self.mention_accounts.is_empty() {
            let mentions: Vec<String> = self
                .mention_accounts
                .iter()
                .map(|a| format!("@{}", a))
                .collect();
            q.push_str(&format!(" ({})", mentions.join(" OR ")));
        }
        if let Some(count) = self.min_replies {
            q.push_str(&format!(" min_replies:{}", count));
        }
        if let Some(count) = self.min_faves {
            q.push_str(&format!(" min_faves:{}", count));
        }
        if let Some(count) = self.min_retweets {
            q.push_str(&format!(" min_retweets:{}", count));
        }
        if let Some(date) = self.since {
            q.push_str(&format!(" since:{}", date.format("%Y-%m-%d")));
        }
        if let Some(date) = self.until {
            q.push_str(&format!(" until:{}", date.format("%Y-%m-%d")));
        }

        q.trim().to_string()
    }
}
