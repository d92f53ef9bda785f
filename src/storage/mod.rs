pub mod traits;
pub mod sqlite;

pub use traits::{FeedRepository, PostRepository};
pub use sqlite::{connect, SqliteFeedRepository, SqlitePostRepository, SqliteStorage};
