//! Article engine type definitions.

use chatbox_llm::ChatRole;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A document a session answers questions about.
///
/// Field aliases accept the column names of the upstream article table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    /// Opaque article key
    pub id: String,

    #[serde(default)]
    pub title: String,

    /// Short teaser text
    #[serde(default, alias = "teaser_text")]
    pub summary: Option<String>,

    /// Source document
    #[serde(default)]
    pub full_text: String,

    #[serde(default, alias = "gemini_category")]
    pub category: String,

    #[serde(default, alias = "gemini_sub_category")]
    pub sub_category: String,

    #[serde(default)]
    pub author: Option<String>,

    /// Stored as `YYYY-MM-DD`
    #[serde(default)]
    pub publication_date: Option<String>,
}

/// Article categories as shown in listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Categories {
    pub main: String,
    pub sub: String,
}

/// One entry of the article listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleListing {
    pub id: String,
    pub title: String,
    pub summary: String,
    pub categories: Categories,
}

impl From<&Article> for ArticleListing {
    fn from(article: &Article) -> Self {
        let title = if article.title.trim().is_empty() {
            "Untitled".to_string()
        } else {
            article.title.clone()
        };

        let summary = article
            .summary
            .clone()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| "No summary available".to_string());

        Self {
            id: article.id.clone(),
            title,
            summary,
            categories: Categories {
                main: article.category.clone(),
                sub: article.sub_category.clone(),
            },
        }
    }
}

/// A contiguous slice of an article's text, the unit of retrieval.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    /// Index in document order
    pub position: usize,
    pub text: String,
}

/// One role-tagged message of a session's conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub role: ChatRole,
    pub message: String,
}

impl Turn {
    pub fn new(role: ChatRole, message: impl Into<String>) -> Self {
        Self {
            role,
            message: message.into(),
        }
    }
}

impl fmt::Display for Turn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.role, self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_article_accepts_table_column_names() {
        let json = r#"{
            "id": "a1",
            "title": "Sky",
            "teaser_text": "A short piece about sky color.",
            "full_text": "The sky is blue.",
            "gemini_category": "Science",
            "gemini_sub_category": "Weather"
        }"#;

        let article: Article = serde_json::from_str(json).unwrap();
        assert_eq!(article.summary.as_deref(), Some("A short piece about sky color."));
        assert_eq!(article.category, "Science");
        assert_eq!(article.sub_category, "Weather");
        assert_eq!(article.author, None);
    }

    #[test]
    fn test_listing_defaults() {
        let article = Article {
            id: "a2".to_string(),
            title: String::new(),
            summary: None,
            full_text: String::new(),
            category: String::new(),
            sub_category: String::new(),
            author: None,
            publication_date: None,
        };

        let listing = ArticleListing::from(&article);
        assert_eq!(listing.title, "Untitled");
        assert_eq!(listing.summary, "No summary available");
        assert_eq!(listing.categories.main, "");
    }

    #[test]
    fn test_turn_display() {
        let turn = Turn::new(ChatRole::User, "who wrote this?");
        assert_eq!(turn.to_string(), "user: who wrote this?");
    }
}
