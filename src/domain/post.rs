use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::document::{check_max_chars, check_url, require_text, Document};
use crate::errors::ValidationError;

pub const POST_TITLE_MAX: usize = 512;
pub const SIGNATURE_LEN: usize = 64;

/// Lowercase hex SHA-256 of the UTF-8 bytes of `content`
pub fn signature_of(content: &str) -> String {
    let hash = Sha256::digest(content.as_bytes());
    format!("{:x}", hash)
}

/// A single article, stored in the `posts` collection.
///
/// `signature` is derived from `content` and rewritten on every save, so
/// setting it by hand has no lasting effect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub feed: Option<i64>,
    pub title: Option<String>,
    pub url: String,
    pub pubdate: Option<DateTime<Utc>>,
    pub content: String,
    pub signature: String,
    pub created: DateTime<Utc>,
    pub updated: DateTime<Utc>,
}

impl Post {
    pub fn new(url: String, content: String) -> Self {
        let now = Utc::now();
        let signature = signature_of(&content);
        Self {
            id: None,
            feed: None,
            title: None,
            url,
            pubdate: None,
            content,
            signature,
            created: now,
            updated: now,
        }
    }

    pub fn with_feed(mut self, feed_id: Option<i64>) -> Self {
        self.feed = feed_id;
        self
    }

    pub fn with_title(mut self, title: Option<String>) -> Self {
        self.title = title;
        self
    }

    pub fn with_pubdate(mut self, pubdate: Option<DateTime<Utc>>) -> Self {
        self.pubdate = pubdate;
        self
    }

    /// SHA-256 hex digest of the current content
    pub fn hash(&self) -> String {
        signature_of(&self.content)
    }
}

impl Document for Post {
    const COLLECTION: &'static str = "posts";

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn prepare(&mut self, now: DateTime<Utc>) {
        self.updated = now;
        self.signature = self.hash();
    }

    fn validate(&self) -> Result<(), ValidationError> {
        check_max_chars("title", self.title.as_deref(), POST_TITLE_MAX)?;
        require_text("url", &self.url)?;
        check_url("url", &self.url)?;
        require_text("content", &self.content)?;

        let actual = self.signature.chars().count();
        if actual != SIGNATURE_LEN {
            return Err(ValidationError::InvalidLength {
                field: "signature",
                expected: SIGNATURE_LEN,
                actual,
            });
        }
        Ok(())
    }
}
