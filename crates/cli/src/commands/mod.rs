//! Command handlers for the Chatbox CLI.
//!
//! This module organizes all CLI commands into separate submodules.

pub mod articles;
pub mod ask;
pub mod chat;
pub mod import;
pub mod serve;

// Re-export command types for convenience
pub use articles::ArticlesCommand;
pub use ask::AskCommand;
pub use chat::ChatCommand;
pub use import::ImportCommand;
pub use serve::ServeCommand;

use chatbox_article::{
    AnsweringMechanism, LlmMechanism, Session, SessionRegistry, SqliteArticleStore,
};
use chatbox_core::config::{AppConfig, EngineConfig};
use chatbox_core::{AppError, AppResult};
use chatbox_llm::create_client;
use chatbox_prompt::PromptSet;
use std::sync::Arc;

/// Everything a command needs to open sessions.
pub struct Engine {
    pub store: Arc<SqliteArticleStore>,
    pub mechanism: Arc<dyn AnsweringMechanism>,
    pub prompts: Arc<PromptSet>,
    pub tuning: EngineConfig,
}

impl Engine {
    /// Build the store, answering mechanism and prompts from configuration.
    pub fn from_config(config: &AppConfig) -> AppResult<Self> {
        config.validate()?;

        let store = Arc::new(open_store(config)?);

        let endpoint = config.resolve_endpoint();
        let api_key = config.resolve_api_key(&config.provider);
        let client = create_client(&config.provider, endpoint.as_deref(), api_key.as_deref())
            .map_err(AppError::Config)?;

        tracing::debug!(
            "Answering with {} model {} (timeout {:?})",
            client.provider_name(),
            config.model,
            config.request_timeout()
        );

        let mechanism = Arc::new(
            LlmMechanism::new(client, config.model.clone(), config.request_timeout())
                .with_sampling(config.temperature(), config.max_tokens()),
        );

        let prompts = Arc::new(PromptSet::load(&config.workspace)?);

        Ok(Self {
            store,
            mechanism,
            prompts,
            tuning: config.engine,
        })
    }

    /// Open a primed session for an article.
    pub async fn open_session(&self, article_id: &str) -> AppResult<Session> {
        Session::open(
            article_id,
            self.store.as_ref(),
            Arc::clone(&self.mechanism),
            Arc::clone(&self.prompts),
            self.tuning,
        )
        .await
    }

    pub fn into_registry(self) -> SessionRegistry {
        SessionRegistry::new(self.store, self.mechanism, self.prompts, self.tuning)
    }
}

/// Open the configured article store.
pub fn open_store(config: &AppConfig) -> AppResult<SqliteArticleStore> {
    SqliteArticleStore::open(&config.store_path())
}

/// Print a JSON value the way every `--json` flag does.
pub fn print_json(value: &serde_json::Value) -> AppResult<()> {
    let json = serde_json::to_string_pretty(value)?;
    println!("{}", json);
    Ok(())
}
