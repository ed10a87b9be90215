//! Shared access to sessions for long-running front ends.

use crate::mechanism::AnsweringMechanism;
use crate::session::Session;
use crate::store::ArticleStore;
use crate::types::ArticleListing;
use chatbox_core::config::EngineConfig;
use chatbox_core::AppResult;
use chatbox_prompt::PromptSet;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Identifies one kept session: an article plus a caller-chosen id.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionKey {
    pub article_id: String,
    pub session_id: String,
}

impl SessionKey {
    pub fn new(article_id: impl Into<String>, session_id: impl Into<String>) -> Self {
        Self {
            article_id: article_id.into(),
            session_id: session_id.into(),
        }
    }
}

/// Opens sessions and serializes questions per session.
///
/// Only callers that name a session id get a conversation that outlives
/// one question; those sessions stay open until [`SessionRegistry::reset`].
/// Sessions with different keys share nothing and run concurrently.
pub struct SessionRegistry {
    store: Arc<dyn ArticleStore>,
    mechanism: Arc<dyn AnsweringMechanism>,
    prompts: Arc<PromptSet>,
    engine: EngineConfig,
    sessions: Mutex<HashMap<SessionKey, Arc<Mutex<Session>>>>,
}

impl SessionRegistry {
    pub fn new(
        store: Arc<dyn ArticleStore>,
        mechanism: Arc<dyn AnsweringMechanism>,
        prompts: Arc<PromptSet>,
        engine: EngineConfig,
    ) -> Self {
        Self {
            store,
            mechanism,
            prompts,
            engine,
            sessions: Mutex::new(HashMap::new()),
        }
    }

    async fn open(&self, article_id: &str) -> AppResult<Session> {
        Session::open(
            article_id,
            self.store.as_ref(),
            Arc::clone(&self.mechanism),
            Arc::clone(&self.prompts),
            self.engine,
        )
        .await
    }

    /// The kept session for `key`, opening it if needed.
    pub async fn session(&self, key: &SessionKey) -> AppResult<Arc<Mutex<Session>>> {
        if let Some(session) = self.sessions.lock().await.get(key) {
            return Ok(Arc::clone(session));
        }

        // Opened without holding the map lock; priming waits on the mechanism
        let opened = self.open(&key.article_id).await?;

        let mut sessions = self.sessions.lock().await;
        let session = sessions
            .entry(key.clone())
            .or_insert_with(|| Arc::new(Mutex::new(opened)));
        Ok(Arc::clone(session))
    }

    /// Ask a question about an article.
    ///
    /// Without a `session_id` the question gets a session of its own that
    /// closes once answered. Fails only when the session cannot be opened.
    pub async fn ask(
        &self,
        article_id: &str,
        session_id: Option<&str>,
        question: &str,
    ) -> AppResult<String> {
        let Some(session_id) = session_id else {
            let mut session = self.open(article_id).await?;
            return Ok(session.ask(question).await);
        };

        let session = self.session(&SessionKey::new(article_id, session_id)).await?;
        let mut session = session.lock().await;
        Ok(session.ask(question).await)
    }

    /// Close every session kept under `session_id`; returns how many.
    pub async fn reset(&self, session_id: &str) -> usize {
        let mut sessions = self.sessions.lock().await;
        let before = sessions.len();
        sessions.retain(|key, _| key.session_id != session_id);
        let closed = before - sessions.len();

        tracing::debug!("Closed {} sessions for id {}", closed, session_id);
        closed
    }

    /// Number of kept sessions.
    pub async fn len(&self) -> usize {
        self.sessions.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    pub async fn list_articles(&self) -> AppResult<Vec<ArticleListing>> {
        self.store.list().await
    }
}
