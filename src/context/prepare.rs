//! Prompt-size bounding for oversized code context.
//!
//! Keeps the head (declarations, imports) and the tail (the most recently
//! edited code) and splices a marker between them, so the prompt sent
//! upstream stays bounded without losing either end of the file.

/// Contexts longer than this are truncated.
const MAX_CONTEXT_CHARS: usize = 8000;

/// Characters kept from the start of an oversized context.
const HEAD_CHARS: usize = 4000;

/// Characters kept from the end of an oversized context.
const TAIL_CHARS: usize = 3000;

/// Marker spliced between the preserved head and tail.
pub const TRUNCATION_MARKER: &str = "\n\n... [context truncated] ...\n\n";

/// Bound a code context for prompt interpolation.
///
/// Inputs at or under the threshold (including empty and very short ones)
/// are returned unchanged; anything longer is reduced to the first
/// [`HEAD_CHARS`] characters, the marker, and the last [`TAIL_CHARS`]
/// characters.
pub fn prepare_context(code_context: &str) -> String {
    let char_count = code_context.chars().count();
    if char_count <= MAX_CONTEXT_CHARS {
        return code_context.to_string();
    }
    let head: String = code_context.chars().take(HEAD_CHARS).collect();
    let tail: String = code_context.chars().skip(char_count - TAIL_CHARS).collect();
    format!("{head}{TRUNCATION_MARKER}{tail}")
}

/// Char-boundary-safe prefix of at most `max_chars` characters.
pub(crate) fn prefix_chars(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}
