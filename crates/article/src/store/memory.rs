//! In-memory article store.

use super::ArticleStore;
use crate::types::{Article, ArticleListing};
use chatbox_core::AppResult;

/// Articles held in a vector, listed in insertion order.
#[derive(Debug, Clone, Default)]
pub struct MemoryArticleStore {
    articles: Vec<Article>,
}

impl MemoryArticleStore {
    pub fn new(articles: Vec<Article>) -> Self {
        Self { articles }
    }
}

#[async_trait::async_trait]
impl ArticleStore for MemoryArticleStore {
    async fn lookup(&self, id: &str) -> AppResult<Option<Article>> {
        Ok(self.articles.iter().find(|a| a.id == id).cloned())
    }

    async fn list(&self) -> AppResult<Vec<ArticleListing>> {
        Ok(self.articles.iter().map(ArticleListing::from).collect())
    }
}
