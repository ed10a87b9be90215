//! Fixed-size text segmentation.

use crate::types::Fragment;

/// Default fragment size in characters.
pub const DEFAULT_CHUNK_SIZE: usize = 100;

/// Split `text` into consecutive fragments of `chunk_size` characters.
///
/// Every fragment but the last holds exactly `chunk_size` characters; the
/// last holds the remainder. Concatenating the fragments in order gives back
/// `text`. No normalization is applied. A `chunk_size` of zero is treated
/// as one.
pub fn segment(text: &str, chunk_size: usize) -> Vec<Fragment> {
    let chunk_size = chunk_size.max(1);
    let mut fragments = Vec::new();
    let mut start = 0;
    let mut count = 0;

    for (idx, _) in text.char_indices() {
        if count == chunk_size {
            fragments.push(Fragment {
                position: fragments.len(),
                text: text[start..idx].to_string(),
            });
            start = idx;
            count = 0;
        }
        count += 1;
    }

    if start < text.len() {
        fragments.push(Fragment {
            position: fragments.len(),
            text: text[start..].to_string(),
        });
    }

    tracing::debug!(
        "Segmented {} chars into {} fragments (size: {})",
        text.chars().count(),
        fragments.len(),
        chunk_size
    );

    fragments
}
