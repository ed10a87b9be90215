//! Article question-answering engine.
//!
//! An article is segmented into fixed-size fragments. Each question selects
//! relevant fragments, is framed with recent conversation history, and goes
//! to an answering mechanism. When the mechanism fails, a rule-based
//! responder answers from the article's metadata and text instead.

pub mod fallback;
pub mod ledger;
pub mod mechanism;
pub mod registry;
pub mod relevance;
pub mod segmenter;
pub mod session;
pub mod store;
pub mod types;

#[cfg(test)]
mod tests;

// Re-export commonly used types
pub use fallback::{FallbackResponder, QuestionKind};
pub use ledger::ConversationLedger;
pub use mechanism::{AnsweringMechanism, LlmMechanism, SessionHandle};
pub use registry::{SessionKey, SessionRegistry};
pub use relevance::select_context;
pub use segmenter::segment;
pub use session::{Session, PRIMING_QUESTION};
pub use store::{load_articles_file, ArticleStore, MemoryArticleStore, SqliteArticleStore};
pub use types::{Article, ArticleListing, Categories, Fragment, Turn};
