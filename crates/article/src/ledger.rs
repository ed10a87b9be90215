//! Append-only conversation history of one session.

use crate::types::Turn;
use chatbox_llm::ChatRole;

/// Ordered log of a session's turns.
///
/// Turns are never reordered or removed; the ledger lives as long as its
/// session.
#[derive(Debug, Clone, Default)]
pub struct ConversationLedger {
    turns: Vec<Turn>,
}

impl ConversationLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a turn at the end.
    pub fn append(&mut self, role: ChatRole, message: impl Into<String>) {
        self.turns.push(Turn::new(role, message));
    }

    /// The last `n` turns in original order, fewer if the ledger is shorter.
    pub fn recent(&self, n: usize) -> &[Turn] {
        let start = self.turns.len().saturating_sub(n);
        &self.turns[start..]
    }

    /// Every turn, oldest first.
    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }
}

/// Render turns as `<role>: <message>` lines.
pub fn render_turns(turns: &[Turn]) -> String {
    turns
        .iter()
        .map(Turn::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}
