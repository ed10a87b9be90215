//! Prompt system for Chatbox.
//!
//! This crate provides structured prompt management with:
//! - YAML-based prompt definitions
//! - Built-in article prompts with per-workspace overrides
//! - Handlebars template rendering

pub mod builder;
pub mod defaults;
pub mod loader;
pub mod types;

// Re-export main types
pub use builder::build_prompt;
pub use defaults::{ASK_PROMPT_ID, PRIME_PROMPT_ID};
pub use loader::{load_prompt, PromptSet};
pub use types::{BuiltPrompt, BuiltPromptMetadata, PromptDefinition};
