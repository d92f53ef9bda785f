use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::document::{check_max_chars, check_url, require_text, Document};
use crate::errors::ValidationError;

pub const FEED_TITLE_MAX: usize = 256;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedType {
    #[default]
    Rss,
    Atom,
    Xml,
    Json,
}

impl FeedType {
    pub const ALL: [FeedType; 4] = [FeedType::Rss, FeedType::Atom, FeedType::Xml, FeedType::Json];

    pub fn as_str(&self) -> &'static str {
        match self {
            FeedType::Rss => "rss",
            FeedType::Atom => "atom",
            FeedType::Xml => "xml",
            FeedType::Json => "json",
        }
    }
}

impl std::str::FromStr for FeedType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "rss" => Ok(FeedType::Rss),
            "atom" => Ok(FeedType::Atom),
            "xml" => Ok(FeedType::Xml),
            "json" => Ok(FeedType::Json),
            _ => Err(ValidationError::InvalidChoice {
                field: "type",
                value: s.to_string(),
                allowed: FeedType::ALL
                    .iter()
                    .map(FeedType::as_str)
                    .collect::<Vec<_>>()
                    .join(", "),
            }),
        }
    }
}

impl std::fmt::Display for FeedType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A subscribed syndication source, stored in the `feeds` collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feed {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(rename = "type", default)]
    pub feed_type: FeedType,
    pub title: Option<String>,
    pub xmlurl: String,
    pub htmlurl: Option<String>,
    pub category: String,
    pub created: DateTime<Utc>,
    pub updated: DateTime<Utc>,
}

impl Feed {
    pub fn new(xmlurl: String, category: String) -> Self {
        let now = Utc::now();
        Self {
            id: None,
            feed_type: FeedType::default(),
            title: None,
            xmlurl,
            htmlurl: None,
            category,
            created: now,
            updated: now,
        }
    }

    pub fn with_type(mut self, feed_type: FeedType) -> Self {
        self.feed_type = feed_type;
        self
    }

    pub fn with_title(mut self, title: Option<String>) -> Self {
        self.title = title;
        self
    }

    pub fn with_htmlurl(mut self, htmlurl: Option<String>) -> Self {
        self.htmlurl = htmlurl;
        self
    }

    /// Title for display, falling back to the feed URL
    pub fn display_title(&self) -> &str {
        self.title.as_deref().unwrap_or(&self.xmlurl)
    }
}

impl Document for Feed {
    const COLLECTION: &'static str = "feeds";

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn prepare(&mut self, now: DateTime<Utc>) {
        self.updated = now;
    }

    fn validate(&self) -> Result<(), ValidationError> {
        check_max_chars("title", self.title.as_deref(), FEED_TITLE_MAX)?;
        require_text("xmlurl", &self.xmlurl)?;
        check_url("xmlurl", &self.xmlurl)?;
        if let Some(htmlurl) = &self.htmlurl {
            check_url("htmlurl", htmlurl)?;
        }
        require_text("category", &self.category)?;
        Ok(())
    }
}
