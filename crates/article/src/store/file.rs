//! Article import files.

use crate::types::Article;
use chatbox_core::{AppError, AppResult};
use std::path::Path;

/// Read a list of articles from a JSON array or a YAML sequence.
///
/// Files ending in `.json` are parsed as JSON, everything else as YAML.
pub fn load_articles_file(path: &Path) -> AppResult<Vec<Article>> {
    let contents = std::fs::read_to_string(path).map_err(|e| {
        AppError::Article(format!("Failed to read articles file {:?}: {}", path, e))
    })?;

    let is_json = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    let articles: Vec<Article> = if is_json {
        serde_json::from_str(&contents)?
    } else {
        serde_yaml::from_str(&contents)?
    };

    if let Some(article) = articles.iter().find(|a| a.id.trim().is_empty()) {
        return Err(AppError::Article(format!(
            "Article without id in {:?} (title: {:?})",
            path, article.title
        )));
    }

    tracing::debug!("Read {} articles from {:?}", articles.len(), path);
    Ok(articles)
}
