use crate::domain::{Feed, Post};
use crate::errors::BaleenResult;

/// Persistence for the `feeds` collection.
///
/// `save` inserts records without an id and updates the rest; either way the
/// record's pre-save hook runs first and the caller's value is only replaced
/// once the write has succeeded.
#[cfg_attr(test, mockall::automock)]
pub trait FeedRepository: Send + Sync {
    fn save(&self, feed: &mut Feed) -> BaleenResult<i64>;
    fn remove(&self, id: i64) -> BaleenResult<()>;
    fn get_all(&self) -> BaleenResult<Vec<Feed>>;
    fn get_by_id(&self, id: i64) -> BaleenResult<Option<Feed>>;
    fn get_by_xmlurl(&self, xmlurl: &str) -> BaleenResult<Option<Feed>>;
}

/// Persistence for the `posts` collection.
#[cfg_attr(test, mockall::automock)]
pub trait PostRepository: Send + Sync {
    fn save(&self, post: &mut Post) -> BaleenResult<i64>;
    fn remove(&self, id: i64) -> BaleenResult<()>;
    fn get_by_id(&self, id: i64) -> BaleenResult<Option<Post>>;
    fn get_by_url(&self, url: &str) -> BaleenResult<Option<Post>>;
    fn get_by_signature(&self, signature: &str) -> BaleenResult<Option<Post>>;
    fn get_for_feed(&self, feed_id: i64) -> BaleenResult<Vec<Post>>;
}
