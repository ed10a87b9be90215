//! The primary answering mechanism seen by sessions.
//!
//! A mechanism keeps its own dialogue per [`SessionHandle`]; sessions only
//! submit prompts and read replies.

use chatbox_core::{AppError, AppResult};
use chatbox_llm::{ChatMessage, ChatRequest, LlmClient};
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use uuid::Uuid;

/// Opaque key of one session's dialogue inside a mechanism.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionHandle(Uuid);

impl SessionHandle {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionHandle {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Stateful, fallible free-form responder.
#[async_trait::async_trait]
pub trait AnsweringMechanism: Send + Sync {
    /// Start a new dialogue.
    fn open(&self) -> SessionHandle;

    /// Send `prompt` as the next message of the handle's dialogue and return
    /// the reply.
    async fn submit(&self, handle: &SessionHandle, prompt: &str) -> AppResult<String>;

    /// Forget the handle's dialogue.
    fn close(&self, handle: &SessionHandle);
}

/// [`AnsweringMechanism`] backed by an [`LlmClient`].
///
/// The full dialogue is resent on every call. An exchange joins the dialogue
/// only when it succeeds, so a failed or timed-out call leaves no trace.
pub struct LlmMechanism {
    client: Arc<dyn LlmClient>,
    model: String,
    timeout: Duration,
    temperature: Option<f32>,
    max_tokens: Option<u32>,
    dialogues: Mutex<HashMap<SessionHandle, Vec<ChatMessage>>>,
}

impl LlmMechanism {
    pub fn new(client: Arc<dyn LlmClient>, model: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client,
            model: model.into(),
            timeout,
            temperature: None,
            max_tokens: None,
            dialogues: Mutex::new(HashMap::new()),
        }
    }

    /// Sampling settings sent with every request; `None` leaves the
    /// provider's default.
    pub fn with_sampling(mut self, temperature: Option<f32>, max_tokens: Option<u32>) -> Self {
        self.temperature = temperature;
        self.max_tokens = max_tokens;
        self
    }

    fn request(&self, messages: Vec<ChatMessage>) -> ChatRequest {
        let mut request = ChatRequest::new(&self.model, messages);
        if let Some(temperature) = self.temperature {
            request = request.with_temperature(temperature);
        }
        if let Some(max_tokens) = self.max_tokens {
            request = request.with_max_tokens(max_tokens);
        }
        request
    }

    fn dialogue(&self, handle: &SessionHandle) -> AppResult<Vec<ChatMessage>> {
        let dialogues = self
            .dialogues
            .lock()
            .map_err(|_| AppError::Llm("Dialogue store poisoned".to_string()))?;

        dialogues
            .get(handle)
            .cloned()
            .ok_or_else(|| AppError::Llm(format!("Unknown session handle {}", handle)))
    }

    /// Number of messages recorded for a handle.
    pub fn dialogue_len(&self, handle: &SessionHandle) -> usize {
        self.dialogue(handle).map(|d| d.len()).unwrap_or(0)
    }
}

#[async_trait::async_trait]
impl AnsweringMechanism for LlmMechanism {
    fn open(&self) -> SessionHandle {
        let handle = SessionHandle::new();
        if let Ok(mut dialogues) = self.dialogues.lock() {
            dialogues.insert(handle, Vec::new());
        }
        tracing::debug!("Opened dialogue {} on {}", handle, self.client.provider_name());
        handle
    }

    async fn submit(&self, handle: &SessionHandle, prompt: &str) -> AppResult<String> {
        let mut messages = self.dialogue(handle)?;
        messages.push(ChatMessage::user(prompt));

        let request = self.request(messages);

        let response = tokio::time::timeout(self.timeout, self.client.chat(&request))
            .await
            .map_err(|_| {
                AppError::Llm(format!(
                    "{} did not answer within {}s",
                    self.client.provider_name(),
                    self.timeout.as_secs_f64()
                ))
            })??;

        let reply = response.content.trim().to_string();
        if reply.is_empty() {
            return Err(AppError::Llm(format!(
                "{} returned an empty reply",
                self.client.provider_name()
            )));
        }

        tracing::debug!(
            "Dialogue {} answered ({} tokens)",
            handle,
            response.usage.total_tokens
        );

        let mut dialogues = self
            .dialogues
            .lock()
            .map_err(|_| AppError::Llm("Dialogue store poisoned".to_string()))?;
        if let Some(dialogue) = dialogues.get_mut(handle) {
            dialogue.push(ChatMessage::user(prompt));
            dialogue.push(ChatMessage::assistant(reply.clone()));
        }

        Ok(reply)
    }

    fn close(&self, handle: &SessionHandle) {
        if let Ok(mut dialogues) = self.dialogues.lock() {
            dialogues.remove(handle);
        }
        tracing::debug!("Closed dialogue {}", handle);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chatbox_llm::{LlmResponse, LlmUsage, OfflineClient};

    /// Replies with the number of messages it was sent.
    struct CountingClient;

    #[async_trait::async_trait]
    impl LlmClient for CountingClient {
        fn provider_name(&self) -> &str {
            "counting"
        }

        async fn chat(&self, request: &ChatRequest) -> AppResult<LlmResponse> {
            Ok(LlmResponse {
                content: format!("{} messages\n", request.messages.len()),
                model: request.model.clone(),
                usage: LlmUsage::default(),
            })
        }
    }

    /// Replies with the sampling settings it received.
    struct SamplingClient;

    #[async_trait::async_trait]
    impl LlmClient for SamplingClient {
        fn provider_name(&self) -> &str {
            "sampling"
        }

        async fn chat(&self, request: &ChatRequest) -> AppResult<LlmResponse> {
            Ok(LlmResponse {
                content: format!("{:?} {:?}", request.temperature, request.max_tokens),
                model: request.model.clone(),
                usage: LlmUsage::default(),
            })
        }
    }

    struct SlowClient;

    #[async_trait::async_trait]
    impl LlmClient for SlowClient {
        fn provider_name(&self) -> &str {
            "slow"
        }

        async fn chat(&self, _request: &ChatRequest) -> AppResult<LlmResponse> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Err(AppError::Llm("unreachable".to_string()))
        }
    }

    struct BlankClient;

    #[async_trait::async_trait]
    impl LlmClient for BlankClient {
        fn provider_name(&self) -> &str {
            "blank"
        }

        async fn chat(&self, request: &ChatRequest) -> AppResult<LlmResponse> {
            Ok(LlmResponse {
                content: "  ".to_string(),
                model: request.model.clone(),
                usage: LlmUsage::default(),
            })
        }
    }

    fn mechanism(client: Arc<dyn LlmClient>) -> LlmMechanism {
        LlmMechanism::new(client, "test-model", Duration::from_secs(5))
    }

    #[tokio::test]
    async fn test_dialogue_accumulates_per_handle() {
        let mechanism = mechanism(Arc::new(CountingClient));
        let first = mechanism.open();
        let second = mechanism.open();
        assert_ne!(first, second);

        assert_eq!(mechanism.submit(&first, "prime").await.unwrap(), "1 messages");
        assert_eq!(mechanism.submit(&first, "question").await.unwrap(), "3 messages");
        assert_eq!(mechanism.submit(&second, "prime").await.unwrap(), "1 messages");
        assert_eq!(mechanism.dialogue_len(&first), 4);
        assert_eq!(mechanism.dialogue_len(&second), 2);

        mechanism.close(&first);
        assert_eq!(mechanism.dialogue_len(&first), 0);
        assert!(mechanism.submit(&first, "again").await.is_err());
    }

    #[tokio::test]
    async fn test_sampling_settings_reach_the_client() {
        let plain = mechanism(Arc::new(SamplingClient));
        let handle = plain.open();
        assert_eq!(plain.submit(&handle, "hi").await.unwrap(), "None None");

        let tuned = mechanism(Arc::new(SamplingClient)).with_sampling(Some(0.2), Some(200));
        let handle = tuned.open();
        assert_eq!(tuned.submit(&handle, "hi").await.unwrap(), "Some(0.2) Some(200)");
    }

    #[tokio::test]
    async fn test_failures_are_not_recorded() {
        let mechanism = mechanism(Arc::new(OfflineClient));
        let handle = mechanism.open();

        assert!(matches!(
            mechanism.submit(&handle, "hello").await,
            Err(AppError::Llm(_))
        ));
        assert_eq!(mechanism.dialogue_len(&handle), 0);
    }

    #[tokio::test]
    async fn test_empty_reply_is_failure() {
        let mechanism = mechanism(Arc::new(BlankClient));
        let handle = mechanism.open();
        assert!(mechanism.submit(&handle, "hello").await.is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_is_failure() {
        let mechanism = LlmMechanism::new(Arc::new(SlowClient), "m", Duration::from_secs(2));
        let handle = mechanism.open();

        let err = mechanism.submit(&handle, "hello").await.unwrap_err();
        assert!(err.to_string().contains("did not answer within"));
        assert_eq!(mechanism.dialogue_len(&handle), 0);
    }
}
