//! Completion post-processing.
//!
//! Raw model completions arrive wrapped in conversational padding: an
//! acknowledgement line up front, a follow-up offer at the end, fences with
//! missing language tags. The rules here strip that padding and normalize
//! the fencing so the editor renders only substantive content.
//!
//! The phrase tables are configuration data: extend them there, not in the
//! control flow. Every transform is pure and infallible; on unexpected
//! shapes the text passes through unchanged.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::context::language::is_known_label;

/// Opening phrases that mark a disposable acknowledgement line.
pub const OPENER_PHRASES: &[&str] = &[
    "here's", "here is", "sure", "let me", "okay", "certainly", "of course", "great",
];

/// Closing phrases that mark a disposable trailing follow-up.
pub const CLOSER_PHRASES: &[&str] = &[
    "let me know",
    "hope this helps",
    "would you",
    "feel free",
    "if you have any",
];

/// Query phrases that read as a definitional question.
const DEFINITIONAL_MARKERS: &[&str] = &["what is", "how does", "explain", "define"];

const FENCE: &str = "```";

/// Text ahead of the first fence shorter than this is a dropped preamble.
const MAX_PREFENCE_CHARS: usize = 100;

/// Ceiling for unwrapping a fenced simple answer into prose.
const MAX_SIMPLE_ANSWER_CHARS: usize = 300;

static OPENER_RE: Lazy<Regex> = Lazy::new(|| {
    let alternatives = OPENER_PHRASES.join("|");
    Regex::new(&format!(r"(?i)^\s*(?:{alternatives})\b")).unwrap()
});

static CLOSER_RE: Lazy<Regex> = Lazy::new(|| {
    let alternatives = CLOSER_PHRASES.join("|");
    Regex::new(&format!(r"(?i)\b(?:{alternatives})\b")).unwrap()
});

static EXCESS_NEWLINES_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{3,}").unwrap());

/// Strip conversational padding from a raw completion.
///
/// Rules, in order: drop a leading acknowledgement line, drop a trailing
/// follow-up, drop a short pre-fence preamble, collapse newline runs.
/// Idempotent for the shapes the rules target.
pub fn clean(raw: &str) -> String {
    let text = raw.trim();
    let text = strip_preamble(text);
    let text = strip_postamble(text);
    let text = drop_short_prefence_preamble(text);
    let collapsed = EXCESS_NEWLINES_RE.replace_all(text, "\n\n");
    collapsed.trim().to_string()
}

/// Finalize a completion destined for a code-shaped reply.
///
/// An untagged first fence gets the resolved language injected; a
/// fence-less completion that looks like code is wrapped in a single
/// tagged fence. A fence already tagged with a different language is
/// left alone: replacing a model-chosen tag mislabels more than it fixes.
pub fn finalize_as_code(text: &str, language: &str) -> String {
    if let Some(idx) = text.find(FENCE) {
        return tag_first_fence(text, idx, language);
    }
    if looks_like_code(text) {
        return format!("{FENCE}{language}\n{text}\n{FENCE}");
    }
    text.to_string()
}

/// Finalize a completion destined for a prose-shaped reply.
///
/// A short, fully fenced response to a definitional question is a simple
/// explanation the model mistakenly fenced: the markers come off, along
/// with any bare language-name token left behind.
pub fn finalize_as_prose(text: &str, query: &str) -> String {
    if !is_definitional(query) || text.chars().count() >= MAX_SIMPLE_ANSWER_CHARS {
        return text.to_string();
    }
    match unwrap_single_fence(text) {
        Some(inner) => strip_bare_language_tokens(&inner),
        None => text.to_string(),
    }
}

// -- cleaning rules -----------------------------------------------------

fn strip_preamble(text: &str) -> &str {
    // Without a line break there is nothing left after the "preamble";
    // degrade to identity rather than erase a one-line answer.
    let Some((first_line, rest)) = text.split_once('\n') else {
        return text;
    };
    if OPENER_RE.is_match(first_line) {
        rest
    } else {
        text
    }
}

fn strip_postamble(text: &str) -> &str {
    let tail_start = text.rfind('\n').map(|i| i + 1).unwrap_or(0);
    match CLOSER_RE.find(&text[tail_start..]) {
        Some(m) => text[..tail_start + m.start()].trim_end(),
        None => text,
    }
}

fn drop_short_prefence_preamble(text: &str) -> &str {
    match text.find(FENCE) {
        Some(idx) if idx > 0 && text[..idx].chars().count() < MAX_PREFENCE_CHARS => &text[idx..],
        _ => text,
    }
}

// -- finalization helpers -----------------------------------------------

fn tag_first_fence(text: &str, fence_idx: usize, language: &str) -> String {
    let after = &text[fence_idx + FENCE.len()..];
    let tag = after[..after.find('\n').unwrap_or(after.len())].trim();
    if tag.is_empty() && !language.is_empty() {
        format!("{}{FENCE}{language}{after}", &text[..fence_idx])
    } else {
        text.to_string()
    }
}

fn looks_like_code(text: &str) -> bool {
    text.contains(';')
        || (text.contains('(') && text.contains(')'))
        || (text.contains('{') && text.contains('}'))
        || text.contains("def ")
        || text.contains("function")
}

fn is_definitional(query: &str) -> bool {
    let query = query.to_lowercase();
    DEFINITIONAL_MARKERS.iter().any(|m| query.contains(m))
}

/// The fence body when the whole text is a single fenced block.
fn unwrap_single_fence(text: &str) -> Option<String> {
    let trimmed = text.trim();
    let body = trimmed.strip_prefix(FENCE)?.strip_suffix(FENCE)?;
    if body.contains(FENCE) {
        return None;
    }
    Some(body.trim().to_string())
}

fn strip_bare_language_tokens(text: &str) -> String {
    text.lines()
        .filter(|line| !is_known_label(&line.trim().to_lowercase()))
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}
