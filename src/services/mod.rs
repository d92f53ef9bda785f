pub mod feed_service;
pub mod post_service;

pub use feed_service::{FeedService, NewFeed};
pub use post_service::{NewPost, PostService};
