//! Term-overlap context selection.
//!
//! Fragments are scanned in document order and the first `top_k` that
//! contain any query or recent-turn term are kept. This favors recall and
//! earliest occurrence over best fit; callers rely on first-match order.

use crate::types::{Fragment, Turn};

/// Default number of fragments to select.
pub const DEFAULT_TOP_K: usize = 3;

/// Returned when no fragment contains any term.
pub const NO_MATCH_CONTEXT: &str = "No specific information found in the article.";

/// Build the context string for `query`.
///
/// Terms are the lower-cased whitespace-separated tokens of `query` followed
/// by those of every message in `recent_turns`. A fragment is selected when
/// any term occurs as a substring of its lower-cased text. Selected
/// fragments have `&quot;` decoded and surrounding whitespace trimmed, and
/// are joined with single spaces in selection order.
pub fn select_context(
    query: &str,
    fragments: &[Fragment],
    recent_turns: &[Turn],
    top_k: usize,
) -> String {
    let terms = collect_terms(query, recent_turns);

    let selected: Vec<String> = fragments
        .iter()
        .filter(|fragment| {
            let lower = fragment.text.to_lowercase();
            terms.iter().any(|term| lower.contains(term.as_str()))
        })
        .take(top_k)
        .map(|fragment| clean_fragment(&fragment.text))
        .collect();

    tracing::debug!(
        "Selected {} of {} fragments from {} terms",
        selected.len(),
        fragments.len(),
        terms.len()
    );

    if selected.is_empty() {
        return NO_MATCH_CONTEXT.to_string();
    }

    selected.join(" ")
}

/// Query tokens followed by recent-turn tokens, lower-cased.
fn collect_terms(query: &str, recent_turns: &[Turn]) -> Vec<String> {
    std::iter::once(query)
        .chain(recent_turns.iter().map(|turn| turn.message.as_str()))
        .flat_map(str::split_whitespace)
        .map(str::to_lowercase)
        .collect()
}

fn clean_fragment(text: &str) -> String {
    text.replace("&quot;", "\"").trim().to_string()
}
