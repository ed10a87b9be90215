//! SQLite-backed article store.

use super::ArticleStore;
use crate::types::{Article, ArticleListing};
use chatbox_core::{AppError, AppResult};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS articles (
    id TEXT PRIMARY KEY,
    title TEXT NOT NULL DEFAULT '',
    teaser_text TEXT,
    full_text TEXT NOT NULL DEFAULT '',
    category TEXT NOT NULL DEFAULT '',
    sub_category TEXT NOT NULL DEFAULT '',
    author TEXT,
    publication_date TEXT
);
"#;

const ARTICLE_COLUMNS: &str =
    "id, title, teaser_text, full_text, category, sub_category, author, publication_date";

/// Articles persisted in a single SQLite table.
pub struct SqliteArticleStore {
    conn: Mutex<Connection>,
}

impl SqliteArticleStore {
    /// Open (and create if needed) the store at `db_path`.
    pub fn open(db_path: &Path) -> AppResult<Self> {
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                AppError::Article(format!("Failed to create store directory: {}", e))
            })?;
        }

        let conn = Connection::open(db_path)
            .map_err(|e| AppError::Article(format!("Failed to open article store: {}", e)))?;

        tracing::debug!("Opened article store at {:?}", db_path);
        Self::with_connection(conn)
    }

    /// A throwaway store living in memory.
    pub fn open_in_memory() -> AppResult<Self> {
        let conn = Connection::open_in_memory()
            .map_err(|e| AppError::Article(format!("Failed to open article store: {}", e)))?;
        Self::with_connection(conn)
    }

    fn with_connection(conn: Connection) -> AppResult<Self> {
        conn.execute_batch(SCHEMA)
            .map_err(|e| AppError::Article(format!("Failed to create tables: {}", e)))?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> AppResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| AppError::Article("Article store connection poisoned".to_string()))
    }

    /// Insert or replace articles; returns how many were written.
    ///
    /// Replacing an article keeps its original listing position.
    pub fn import(&self, articles: &[Article]) -> AppResult<usize> {
        let mut conn = self.conn()?;
        let tx = conn
            .transaction()
            .map_err(|e| AppError::Article(format!("Failed to start import: {}", e)))?;

        for article in articles {
            tx.execute(
                "INSERT INTO articles (id, title, teaser_text, full_text, category, sub_category, author, publication_date)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
                 ON CONFLICT(id) DO UPDATE SET
                    title = excluded.title,
                    teaser_text = excluded.teaser_text,
                    full_text = excluded.full_text,
                    category = excluded.category,
                    sub_category = excluded.sub_category,
                    author = excluded.author,
                    publication_date = excluded.publication_date",
                params![
                    article.id,
                    article.title,
                    article.summary,
                    article.full_text,
                    article.category,
                    article.sub_category,
                    article.author,
                    article.publication_date,
                ],
            )
            .map_err(|e| AppError::Article(format!("Failed to import article {}: {}", article.id, e)))?;
        }

        tx.commit()
            .map_err(|e| AppError::Article(format!("Failed to commit import: {}", e)))?;

        tracing::info!("Imported {} articles", articles.len());
        Ok(articles.len())
    }

    /// Number of stored articles.
    pub fn count(&self) -> AppResult<usize> {
        let conn = self.conn()?;
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM articles", [], |row| row.get(0))
            .map_err(|e| AppError::Article(format!("Failed to count articles: {}", e)))?;
        Ok(count as usize)
    }
}

fn row_to_article(row: &Row<'_>) -> rusqlite::Result<Article> {
    Ok(Article {
        id: row.get(0)?,
        title: row.get(1)?,
        summary: row.get(2)?,
        full_text: row.get(3)?,
        category: row.get(4)?,
        sub_category: row.get(5)?,
        author: row.get(6)?,
        publication_date: row.get(7)?,
    })
}

#[async_trait::async_trait]
impl ArticleStore for SqliteArticleStore {
    async fn lookup(&self, id: &str) -> AppResult<Option<Article>> {
        let conn = self.conn()?;
        conn.query_row(
            &format!("SELECT {} FROM articles WHERE id = ?1", ARTICLE_COLUMNS),
            params![id],
            row_to_article,
        )
        .optional()
        .map_err(|e| AppError::Article(format!("Failed to look up article {}: {}", id, e)))
    }

    async fn list(&self) -> AppResult<Vec<ArticleListing>> {
        let conn = self.conn()?;
        let mut stmt = conn
            .prepare(&format!("SELECT {} FROM articles ORDER BY rowid", ARTICLE_COLUMNS))
            .map_err(|e| AppError::Article(format!("Failed to prepare listing: {}", e)))?;

        let articles = stmt
            .query_map([], row_to_article)
            .map_err(|e| AppError::Article(format!("Failed to list articles: {}", e)))?
            .collect::<rusqlite::Result<Vec<_>>>()
            .map_err(|e| AppError::Article(format!("Failed to read article row: {}", e)))?;

        Ok(articles.iter().map(ArticleListing::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn article(id: &str, title: &str) -> Article {
        Article {
            id: id.to_string(),
            title: title.to_string(),
            summary: Some(format!("About {}", title)),
            full_text: format!("{} full text", title),
            category: "News".to_string(),
            sub_category: "Local".to_string(),
            author: None,
            publication_date: Some("2024-01-02".to_string()),
        }
    }

    #[tokio::test]
    async fn test_import_and_lookup() {
        let store = SqliteArticleStore::open_in_memory().unwrap();
        store.import(&[article("a1", "Sky"), article("a2", "Sea")]).unwrap();

        let found = store.lookup("a2").await.unwrap().unwrap();
        assert_eq!(found, article("a2", "Sea"));
        assert!(store.lookup("a3").await.unwrap().is_none());
        assert_eq!(store.count().unwrap(), 2);
    }

    #[tokio::test]
    async fn test_reimport_updates_in_place() {
        let store = SqliteArticleStore::open_in_memory().unwrap();
        store.import(&[article("a1", "Sky"), article("a2", "Sea")]).unwrap();
        store.import(&[article("a1", "Sky, revised")]).unwrap();

        let listing = store.list().await.unwrap();
        assert_eq!(listing.len(), 2);
        assert_eq!(listing[0].id, "a1");
        assert_eq!(listing[0].title, "Sky, revised");
        assert_eq!(listing[0].categories.main, "News");
        assert_eq!(listing[1].id, "a2");
    }

    #[tokio::test]
    async fn test_persists_across_reopen() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nested/articles.db");

        SqliteArticleStore::open(&path)
            .unwrap()
            .import(&[article("a1", "Sky")])
            .unwrap();

        let reopened = SqliteArticleStore::open(&path).unwrap();
        assert!(reopened.lookup("a1").await.unwrap().is_some());
    }
}
