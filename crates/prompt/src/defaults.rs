//! Built-in article prompts.
//!
//! Workspaces may replace either one with `.chatbox/prompts/<id>.yml`.

/// System instruction sent once when a session opens. Variables: `context`.
pub const PRIME_PROMPT_ID: &str = "article.prime";

/// Per-question prompt. Variables: `history`, `context`, `question`.
pub const ASK_PROMPT_ID: &str = "article.ask";

pub(crate) const PRIME_PROMPT_YAML: &str = r#"
id: article.prime
title: Article session priming
apiVersion: "1.0"
createdBy: chatbox
template: |-
  You are an AI assistant helping users understand this article. Here is the relevant content:

  {{context}}

  Please help answer questions about this article. Use both the article content and our conversation history to provide relevant answers.
"#;

pub(crate) const ASK_PROMPT_YAML: &str = r#"
id: article.ask
title: Article question
apiVersion: "1.0"
createdBy: chatbox
template: |-
  You are a helpful AI assistant. You have access to both the article content and our conversation history.

  Previous conversation:
  {{history}}

  Article content: {{context}}

  Question: {{question}}

  Please provide a brief, direct answer that:
  1. Answers the question in 1-2 sentences
  2. Uses any available information (article, conversation history, or general knowledge)
  3. Keeps the tone casual and natural
  4. Focuses on the most important information
  5. Don't mention where the information comes from

  Your response:
"#;

/// Built-in definition source for an id, if one exists.
pub(crate) fn builtin_yaml(prompt_id: &str) -> Option<&'static str> {
    match prompt_id {
        PRIME_PROMPT_ID => Some(PRIME_PROMPT_YAML),
        ASK_PROMPT_ID => Some(ASK_PROMPT_YAML),
        _ => None,
    }
}
