//! Import command handler.
//!
//! Loads articles from a JSON or YAML file into the article store.

use super::{open_store, print_json};
use chatbox_article::load_articles_file;
use chatbox_core::{config::AppConfig, AppResult};
use clap::Args;
use std::path::PathBuf;

/// Import articles from a JSON or YAML file
#[derive(Args, Debug)]
pub struct ImportCommand {
    /// File holding a list of articles
    pub file: PathBuf,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl ImportCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing import command for {:?}", self.file);

        let articles = load_articles_file(&self.file)?;
        let store = open_store(config)?;
        let imported = store.import(&articles)?;
        let total = store.count()?;

        if self.json {
            print_json(&serde_json::json!({
                "imported": imported,
                "total": total,
                "store": config.store_path(),
            }))
        } else {
            println!(
                "Imported {} articles into {} ({} total)",
                imported,
                config.store_path().display(),
                total
            );
            Ok(())
        }
    }
}
