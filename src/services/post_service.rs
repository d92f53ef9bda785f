use chrono::{DateTime, Utc};

use crate::domain::post::SIGNATURE_LEN;
use crate::domain::Post;
use crate::errors::{BaleenError, BaleenResult};
use crate::storage::traits::PostRepository;

#[derive(Debug, Clone, Default)]
pub struct NewPost {
    pub url: String,
    pub content: String,
    pub feed: Option<i64>,
    pub title: Option<String>,
    pub pubdate: Option<DateTime<Utc>>,
}

pub struct PostService<R: PostRepository> {
    repository: R,
}

impl<R: PostRepository> PostService<R> {
    pub fn new(repository: R) -> Self {
        Self { repository }
    }

    /// Store a post; its signature is computed from the content on save
    pub fn record(&self, input: NewPost) -> BaleenResult<Post> {
        let mut post = Post::new(input.url, input.content)
            .with_feed(input.feed)
            .with_title(input.title)
            .with_pubdate(input.pubdate);

        self.repository.save(&mut post)?;
        tracing::info!(id = ?post.id, url = %post.url, "Recorded post");

        Ok(post)
    }

    pub fn remove(&self, id: i64) -> BaleenResult<Post> {
        let post = self.repository.get_by_id(id)?.ok_or(BaleenError::NotFound {
            collection: "posts",
            id,
        })?;
        self.repository.remove(id)?;
        tracing::info!(id, url = %post.url, "Removed post");
        Ok(post)
    }

    pub fn for_feed(&self, feed_id: i64) -> BaleenResult<Vec<Post>> {
        self.repository.get_for_feed(feed_id)
    }

    pub fn get(&self, id: i64) -> BaleenResult<Option<Post>> {
        self.repository.get_by_id(id)
    }

    /// Look a post up by ID, signature or URL
    pub fn find(&self, key: &str) -> BaleenResult<Option<Post>> {
        if let Ok(id) = key.parse::<i64>() {
            return self.get(id);
        }
        if key.len() == SIGNATURE_LEN && key.chars().all(|c| c.is_ascii_hexdigit()) {
            return self.repository.get_by_signature(&key.to_lowercase());
        }
        self.repository.get_by_url(key)
    }
}
