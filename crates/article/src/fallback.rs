//! Rule-based answers used when the answering mechanism fails.
//!
//! Questions are classified by an ordered keyword table; the first rule
//! whose keyword occurs in the lower-cased question wins, so a question
//! containing both "what" and "who" is a [`QuestionKind::What`] question.

use crate::relevance::select_context;
use crate::types::{Article, Fragment};
use chrono::NaiveDate;

/// Longest answer, in characters, before truncation.
pub const MAX_ANSWER_CHARS: usize = 100;

const ELLIPSIS: &str = "...";

/// Date layout of `Article::publication_date`.
const STORED_DATE_FORMAT: &str = "%Y-%m-%d";

/// Date layout in answers, e.g. "March 05, 2024".
const DISPLAY_DATE_FORMAT: &str = "%B %d, %Y";

/// Category a fallback question falls into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestionKind {
    /// "what", "tell me about"
    What,
    /// "when", "date", "time"
    When,
    /// "who", "author"
    Who,
    /// "summary", "overview", "about"
    Summary,
    /// Anything else
    General,
}

struct Rule {
    kind: QuestionKind,
    keywords: &'static [&'static str],
}

/// Evaluated top to bottom.
const RULES: &[Rule] = &[
    Rule {
        kind: QuestionKind::What,
        keywords: &["what", "tell me about"],
    },
    Rule {
        kind: QuestionKind::When,
        keywords: &["when", "date", "time"],
    },
    Rule {
        kind: QuestionKind::Who,
        keywords: &["who", "author"],
    },
    Rule {
        kind: QuestionKind::Summary,
        keywords: &["summary", "overview", "about"],
    },
];

impl QuestionKind {
    /// Classify a question by the first matching rule.
    pub fn classify(question: &str) -> Self {
        let lower = question.to_lowercase();
        RULES
            .iter()
            .find(|rule| rule.keywords.iter().any(|keyword| lower.contains(keyword)))
            .map(|rule| rule.kind)
            .unwrap_or(QuestionKind::General)
    }
}

/// Deterministic responder over an article already held in memory.
#[derive(Debug, Clone, Copy)]
pub struct FallbackResponder<'a> {
    article: &'a Article,
    fragments: &'a [Fragment],
    top_k: usize,
}

impl<'a> FallbackResponder<'a> {
    pub fn new(article: &'a Article, fragments: &'a [Fragment], top_k: usize) -> Self {
        Self {
            article,
            fragments,
            top_k,
        }
    }

    /// Answer `question` without the answering mechanism.
    pub fn respond(&self, question: &str) -> String {
        let kind = QuestionKind::classify(question);
        tracing::debug!("Fallback answering {:?} question", kind);

        match kind {
            QuestionKind::What | QuestionKind::General => self.context_answer(question),
            QuestionKind::When => self.publication_date(),
            QuestionKind::Who => self.author(),
            QuestionKind::Summary => self.summary(),
        }
    }

    /// Context for the question alone, without conversation expansion.
    fn context_answer(&self, question: &str) -> String {
        let context = select_context(question, self.fragments, &[], self.top_k);
        truncate(&context, MAX_ANSWER_CHARS)
    }

    fn publication_date(&self) -> String {
        let stored = self
            .article
            .publication_date
            .as_deref()
            .map(str::trim)
            .filter(|date| !date.is_empty());

        match stored {
            None => "Publication date not available".to_string(),
            Some(date) => match format_publication_date(date) {
                Ok(formatted) => format!("Published on {}", formatted),
                Err(e) => {
                    tracing::warn!(
                        "Unparseable publication date '{}' on article {}: {}",
                        date,
                        self.article.id,
                        e
                    );
                    "Error retrieving publication date".to_string()
                }
            },
        }
    }

    fn author(&self) -> String {
        match self.article.author.as_deref().filter(|a| !a.trim().is_empty()) {
            Some(author) => format!("Author: {}", author),
            None => "Author: N/A".to_string(),
        }
    }

    fn summary(&self) -> String {
        match self.article.summary.as_deref().filter(|s| !s.trim().is_empty()) {
            Some(summary) => truncate(summary, MAX_ANSWER_CHARS),
            None => "No summary available.".to_string(),
        }
    }
}

fn format_publication_date(date: &str) -> Result<String, chrono::ParseError> {
    NaiveDate::parse_from_str(date, STORED_DATE_FORMAT)
        .map(|parsed| parsed.format(DISPLAY_DATE_FORMAT).to_string())
}

/// First `limit` characters of `text` plus an ellipsis, or `text` unchanged
/// when it is short enough.
pub fn truncate(text: &str, limit: usize) -> String {
    match text.char_indices().nth(limit) {
        Some((cut, _)) => format!("{}{}", &text[..cut], ELLIPSIS),
        None => text.to_string(),
    }
}
