//! Error types for Chatbox.
//!
//! This module defines a unified error enum that covers all error categories
//! in the application, including configuration, I/O, answering mechanism,
//! article store, and prompt errors.

use thiserror::Error;

/// Unified error type for Chatbox.
///
/// All fallible functions in the workspace return `Result<T, AppError>`.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O and filesystem errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Answering mechanism (LLM provider) errors
    #[error("LLM error: {0}")]
    Llm(String),

    /// Article store errors
    #[error("Article store error: {0}")]
    Article(String),

    /// No article exists for the requested id
    #[error("Article with ID {0} not found")]
    ArticleNotFound(String),

    /// Prompt system errors
    #[error("Prompt error: {0}")]
    Prompt(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Generic errors
    #[error("{0}")]
    Other(String),
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

impl From<serde_yaml::Error> for AppError {
    fn from(err: serde_yaml::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

/// Convenience type alias for Results with AppError.
pub type AppResult<T> = Result<T, AppError>;
