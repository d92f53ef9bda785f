pub mod document;
pub mod feed;
pub mod post;

pub use document::Document;
pub use feed::{Feed, FeedType};
pub use post::{signature_of, Post};
