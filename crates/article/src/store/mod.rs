//! Article lookup and listing.

pub mod file;
pub mod memory;
pub mod sqlite;

pub use file::load_articles_file;
pub use memory::MemoryArticleStore;
pub use sqlite::SqliteArticleStore;

use crate::types::{Article, ArticleListing};
use chatbox_core::AppResult;

/// Source of articles for sessions and listings.
#[async_trait::async_trait]
pub trait ArticleStore: Send + Sync {
    /// Resolve an article by id, `None` if it does not exist.
    async fn lookup(&self, id: &str) -> AppResult<Option<Article>>;

    /// All articles in a stable display order.
    async fn list(&self) -> AppResult<Vec<ArticleListing>>;
}
