//! Scripted answering mechanisms and fixtures.

use crate::mechanism::{AnsweringMechanism, SessionHandle};
use crate::types::Article;
use chatbox_core::{AppError, AppResult};
use std::collections::{HashSet, VecDeque};
use std::sync::Mutex;

/// The article most tests talk about.
pub fn sky_article() -> Article {
    Article {
        id: "a1".to_string(),
        title: "Sky".to_string(),
        summary: Some("Why the sky looks blue.".to_string()),
        full_text: "The sky is blue. ".repeat(10),
        category: "Science".to_string(),
        sub_category: "Weather".to_string(),
        author: Some("Jane Doe".to_string()),
        publication_date: Some("2024-03-05".to_string()),
    }
}

pub fn sea_article() -> Article {
    Article {
        id: "a2".to_string(),
        title: "Sea".to_string(),
        summary: None,
        full_text: "The sea is deep and the tide is strong.".to_string(),
        category: "Science".to_string(),
        sub_category: "Oceans".to_string(),
        author: None,
        publication_date: None,
    }
}

/// Replays queued outcomes in order and records every prompt it receives.
///
/// Once the queue runs dry every submission fails.
#[derive(Default)]
pub struct ScriptedMechanism {
    outcomes: Mutex<VecDeque<Result<String, String>>>,
    prompts: Mutex<Vec<(SessionHandle, String)>>,
    open_handles: Mutex<HashSet<SessionHandle>>,
}

impl ScriptedMechanism {
    pub fn new(outcomes: Vec<Result<&str, &str>>) -> Self {
        let outcomes = outcomes
            .into_iter()
            .map(|o| o.map(str::to_string).map_err(str::to_string))
            .collect();
        Self {
            outcomes: Mutex::new(outcomes),
            ..Self::default()
        }
    }

    /// Answers everything with `reply`.
    pub fn always(reply: &str, times: usize) -> Self {
        Self::new(vec![Ok(reply); times])
    }

    /// Fails everything.
    pub fn broken() -> Self {
        Self::new(Vec::new())
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts
            .lock()
            .unwrap()
            .iter()
            .map(|(_, p)| p.clone())
            .collect()
    }

    pub fn prompts_for(&self, handle: &SessionHandle) -> Vec<String> {
        self.prompts
            .lock()
            .unwrap()
            .iter()
            .filter(|(h, _)| h == handle)
            .map(|(_, p)| p.clone())
            .collect()
    }

    pub fn open_count(&self) -> usize {
        self.open_handles.lock().unwrap().len()
    }
}

#[async_trait::async_trait]
impl AnsweringMechanism for ScriptedMechanism {
    fn open(&self) -> SessionHandle {
        let handle = SessionHandle::new();
        self.open_handles.lock().unwrap().insert(handle);
        handle
    }

    async fn submit(&self, handle: &SessionHandle, prompt: &str) -> AppResult<String> {
        self.prompts
            .lock()
            .unwrap()
            .push((*handle, prompt.to_string()));

        match self.outcomes.lock().unwrap().pop_front() {
            Some(Ok(reply)) => Ok(reply),
            Some(Err(reason)) => Err(AppError::Llm(reason)),
            None => Err(AppError::Llm("script exhausted".to_string())),
        }
    }

    fn close(&self, handle: &SessionHandle) {
        self.open_handles.lock().unwrap().remove(handle);
    }
}
