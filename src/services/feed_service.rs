use crate::domain::{Feed, FeedType};
use crate::errors::{BaleenError, BaleenResult};
use crate::storage::traits::FeedRepository;

/// Raw input for a new subscription, as typed by a user
#[derive(Debug, Clone, Default)]
pub struct NewFeed {
    pub xmlurl: String,
    pub category: String,
    pub feed_type: Option<String>,
    pub title: Option<String>,
    pub htmlurl: Option<String>,
}

pub struct FeedService<R: FeedRepository> {
    repository: R,
}

impl<R: FeedRepository> FeedService<R> {
    pub fn new(repository: R) -> Self {
        Self { repository }
    }

    /// Subscribe to a feed. The type defaults to rss when not given.
    pub fn subscribe(&self, input: NewFeed) -> BaleenResult<Feed> {
        let feed_type = match input.feed_type.as_deref() {
            Some(raw) => raw.parse::<FeedType>()?,
            None => FeedType::default(),
        };

        let mut feed = Feed::new(input.xmlurl, input.category)
            .with_type(feed_type)
            .with_title(input.title)
            .with_htmlurl(input.htmlurl);

        self.repository.save(&mut feed)?;
        tracing::info!(id = ?feed.id, xmlurl = %feed.xmlurl, "Subscribed to feed");

        Ok(feed)
    }

    /// Remove a feed by ID
    pub fn unsubscribe(&self, id: i64) -> BaleenResult<Feed> {
        let feed = self.repository.get_by_id(id)?.ok_or(BaleenError::NotFound {
            collection: "feeds",
            id,
        })?;
        self.repository.remove(id)?;
        tracing::info!(id, xmlurl = %feed.xmlurl, "Unsubscribed from feed");
        Ok(feed)
    }

    /// List all feeds
    pub fn list(&self) -> BaleenResult<Vec<Feed>> {
        self.repository.get_all()
    }

    /// Get a feed by ID
    pub fn get(&self, id: i64) -> BaleenResult<Option<Feed>> {
        self.repository.get_by_id(id)
    }

    pub fn find_by_xmlurl(&self, xmlurl: &str) -> BaleenResult<Option<Feed>> {
        self.repository.get_by_xmlurl(xmlurl)
    }

    /// Look a feed up by ID or, failing that, by its xmlurl
    pub fn find(&self, key: &str) -> BaleenResult<Option<Feed>> {
        match key.parse::<i64>() {
            Ok(id) => self.get(id),
            Err(_) => self.find_by_xmlurl(key),
        }
    }
}
