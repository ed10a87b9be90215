//! Ask command handler.
//!
//! Answers a single question about an article in a fresh session.

use super::{print_json, Engine};
use chatbox_core::{config::AppConfig, AppError, AppResult};
use clap::Args;

/// Ask one question about an article
#[derive(Args, Debug)]
pub struct AskCommand {
    /// ID of the article to ask about
    pub article_id: String,

    /// The question to ask
    pub question: String,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl AskCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing ask command for article {}", self.article_id);

        let question = self.question.trim();
        if question.is_empty() {
            return Err(AppError::Config("Question must not be empty".to_string()));
        }

        let engine = Engine::from_config(config)?;
        let mut session = engine.open_session(&self.article_id).await?;
        let response = session.ask(question).await;

        if self.json {
            print_json(&serde_json::json!({
                "response": response,
                "article_id": self.article_id,
                "question": question,
            }))
        } else {
            println!("{}", response);
            Ok(())
        }
    }
}
