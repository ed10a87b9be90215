//! A conversation about one article.

use crate::fallback::FallbackResponder;
use crate::ledger::{render_turns, ConversationLedger};
use crate::mechanism::{AnsweringMechanism, SessionHandle};
use crate::relevance::select_context;
use crate::segmenter::segment;
use crate::store::ArticleStore;
use crate::types::{Article, Fragment};
use chatbox_core::config::EngineConfig;
use chatbox_core::{AppError, AppResult};
use chatbox_llm::ChatRole;
use chatbox_prompt::{build_prompt, PromptSet};
use std::collections::HashMap;
use std::sync::Arc;

/// Question whose context primes a new session.
pub const PRIMING_QUESTION: &str = "What is this article about?";

/// Binds an article, its fragments, its conversation and a dialogue in the
/// answering mechanism.
///
/// `ask` needs `&mut self`; callers sharing a session must serialize access
/// (see [`crate::registry::SessionRegistry`]).
pub struct Session {
    article: Article,
    fragments: Vec<Fragment>,
    ledger: ConversationLedger,
    handle: SessionHandle,
    mechanism: Arc<dyn AnsweringMechanism>,
    prompts: Arc<PromptSet>,
    engine: EngineConfig,
}

impl Session {
    /// Resolve `article_id` and start a primed session for it.
    ///
    /// # Errors
    /// `AppError::ArticleNotFound` when the store has no such article, or
    /// any store or prompt error.
    pub async fn open(
        article_id: &str,
        store: &dyn ArticleStore,
        mechanism: Arc<dyn AnsweringMechanism>,
        prompts: Arc<PromptSet>,
        engine: EngineConfig,
    ) -> AppResult<Self> {
        let article = store
            .lookup(article_id)
            .await?
            .ok_or_else(|| AppError::ArticleNotFound(article_id.to_string()))?;

        Self::start(article, mechanism, prompts, engine).await
    }

    /// Start a primed session for an article already in hand.
    pub async fn start(
        article: Article,
        mechanism: Arc<dyn AnsweringMechanism>,
        prompts: Arc<PromptSet>,
        engine: EngineConfig,
    ) -> AppResult<Self> {
        let fragments = segment(&article.full_text, engine.chunk_size);
        let handle = mechanism.open();

        tracing::info!(
            "Opening session {} for article {} ({} fragments)",
            handle,
            article.id,
            fragments.len()
        );

        let mut session = Self {
            article,
            fragments,
            ledger: ConversationLedger::new(),
            handle,
            mechanism,
            prompts,
            engine,
        };

        session.prime().await?;
        Ok(session)
    }

    /// Give the mechanism its working context before the first question.
    ///
    /// A mechanism failure here is logged and the session still opens; the
    /// instruction is recorded either way.
    async fn prime(&mut self) -> AppResult<()> {
        let context = select_context(
            PRIMING_QUESTION,
            &self.fragments,
            self.ledger.recent(self.engine.history_window),
            self.engine.top_k,
        );

        let mut variables = HashMap::new();
        variables.insert("context".to_string(), context);
        let instruction = build_prompt(&self.prompts.prime, variables)?.text;

        if let Err(e) = self.mechanism.submit(&self.handle, &instruction).await {
            tracing::warn!(
                "Priming session {} failed, answers will use fallback until the mechanism recovers: {}",
                self.handle,
                e
            );
        }

        self.ledger.append(ChatRole::System, instruction);
        Ok(())
    }

    /// Answer a question about the article.
    ///
    /// Never fails: when the mechanism cannot answer, the fallback responder
    /// does, and that exchange is not recorded in the conversation.
    pub async fn ask(&mut self, question: &str) -> String {
        let prompt = match self.question_prompt(question) {
            Ok(prompt) => prompt,
            Err(e) => {
                tracing::warn!("Could not build prompt, using fallback: {}", e);
                return self.fallback().respond(question);
            }
        };

        match self.mechanism.submit(&self.handle, &prompt).await {
            Ok(reply) => {
                self.ledger.append(ChatRole::User, question);
                self.ledger.append(ChatRole::Assistant, reply.clone());
                reply
            }
            Err(e) => {
                tracing::warn!(
                    "Answering mechanism failed for session {}, using fallback: {}",
                    self.handle,
                    e
                );
                self.fallback().respond(question)
            }
        }
    }

    fn question_prompt(&self, question: &str) -> AppResult<String> {
        let recent = self.ledger.recent(self.engine.history_window);
        let context = select_context(question, &self.fragments, recent, self.engine.top_k);

        let mut variables = HashMap::new();
        variables.insert("history".to_string(), render_turns(recent));
        variables.insert("context".to_string(), context);
        variables.insert("question".to_string(), question.to_string());

        Ok(build_prompt(&self.prompts.ask, variables)?.text)
    }

    /// Rule-based responder over this session's article.
    pub fn fallback(&self) -> FallbackResponder<'_> {
        FallbackResponder::new(&self.article, &self.fragments, self.engine.top_k)
    }

    pub fn article(&self) -> &Article {
        &self.article
    }

    pub fn fragments(&self) -> &[Fragment] {
        &self.fragments
    }

    pub fn ledger(&self) -> &ConversationLedger {
        &self.ledger
    }

    pub fn handle(&self) -> SessionHandle {
        self.handle
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.mechanism.close(&self.handle);
    }
}
