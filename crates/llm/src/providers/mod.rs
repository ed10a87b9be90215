//! LLM provider implementations.

pub mod gemini;
pub mod offline;
pub mod ollama;

pub use gemini::GeminiClient;
pub use offline::OfflineClient;
pub use ollama::OllamaClient;
