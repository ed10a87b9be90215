//! Articles command handler.
//!
//! Lists the articles sessions can be opened for.

use super::{open_store, print_json};
use chatbox_article::{ArticleListing, ArticleStore};
use chatbox_core::{config::AppConfig, AppResult};
use clap::Args;

/// List available articles
#[derive(Args, Debug)]
pub struct ArticlesCommand {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl ArticlesCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing articles command");

        let store = open_store(config)?;
        let articles = store.list().await?;

        if self.json {
            return print_json(&serde_json::json!({ "articles": articles }));
        }

        if articles.is_empty() {
            println!("No articles found. Use 'chatbox import <file>' to add some.");
            return Ok(());
        }

        println!("{}", render_listing(&articles));
        Ok(())
    }
}

/// Numbered `title (ID: id)` lines, starting at 1.
pub fn render_listing(articles: &[ArticleListing]) -> String {
    articles
        .iter()
        .enumerate()
        .map(|(i, article)| format!("{}. {} (ID: {})", i + 1, article.title, article.id))
        .collect::<Vec<_>>()
        .join("\n")
}
