//! LLM integration crate for Chatbox.
//!
//! This crate provides a provider-agnostic abstraction for multi-turn chat
//! with Large Language Models. It supports multiple providers through a
//! unified trait-based interface.
//!
//! # Providers
//! - **Ollama**: Local LLM runtime (default)
//! - **Gemini**: Google Generative Language API
//! - **Offline**: never answers; callers fall back to their own heuristics
//!
//! # Example
//! ```no_run
//! use chatbox_llm::{ChatMessage, ChatRequest, LlmClient, providers::OllamaClient};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = OllamaClient::new();
//! let request = ChatRequest::new("llama3.2", vec![ChatMessage::user("Hello, world!")]);
//! let response = client.chat(&request).await?;
//! println!("{}", response.content);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod factory;
pub mod providers;
pub mod types;

// Re-export main types
pub use client::{ChatMessage, ChatRequest, ChatRole, LlmClient, LlmResponse, LlmUsage};
pub use factory::create_client;
pub use providers::{GeminiClient, OfflineClient, OllamaClient};
pub use types::ProviderType;
