//! Recover a JSON value from model output that was asked to be pure JSON but
//! may be wrapped in prose or a markdown code fence.

use serde_json::Value;

use crate::{
    strategy::{Attempt, first_some},
    types::ExtractionResult,
};

const FENCE: &str = "```";

const ATTEMPTS: [Attempt<str, Value>; 3] = [
    Attempt { name: "direct", run: parse_direct },
    Attempt { name: "fenced block", run: parse_fenced },
    Attempt { name: "brace slice", run: parse_brace_slice },
];

/// Direct parse, then the first fenced block, then first `{` to last `}`.
pub fn extract_structured(raw: &str) -> Option<Value> {
    if raw.trim().is_empty() {
        return None;
    }
    let (attempt, value) = first_some(raw, &ATTEMPTS)?;
    tracing::debug!(attempt, "structured response recovered");
    Some(value)
}

pub fn extract(raw: &str) -> ExtractionResult {
    match extract_structured(raw) {
        Some(value) => ExtractionResult::Parsed(value),
        None => ExtractionResult::Failed {
            raw: raw.to_string(),
        },
    }
}

fn parse_direct(raw: &str) -> Option<Value> {
    serde_json::from_str(raw).ok()
}

fn parse_fenced(raw: &str) -> Option<Value> {
    serde_json::from_str(fenced_block(raw)?).ok()
}

fn parse_brace_slice(raw: &str) -> Option<Value> {
    serde_json::from_str(brace_slice(raw)?).ok()
}

/// Interior of the first fenced block, language tag removed and trimmed.
pub fn fenced_block(raw: &str) -> Option<&str> {
    let open = raw.find(FENCE)?;
    let after_open = &raw[open + FENCE.len()..];
    let close = after_open.find(FENCE)?;
    let inner = &after_open[..close];

    // A tag is a bare word right after the opening fence (```json), ended by
    // whitespace or directly by the payload (```json{...}).
    let tag_len = inner
        .find(|c: char| !(c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '+')))
        .unwrap_or(inner.len());
    let rest = &inner[tag_len..];
    let tag_ended = rest.starts_with(|c: char| c.is_whitespace() || matches!(c, '{' | '['));
    let body = if tag_len > 0 && tag_ended {
        rest
    } else {
        inner
    };
    Some(body.trim())
}

/// Slice from the first `{` to the last `}`, inclusive.
///
/// Braces are not balanced: prose containing stray braces, or two separate
/// objects, widen the slice past the intended object and the parse fails.
pub fn brace_slice(raw: &str) -> Option<&str> {
    let start = raw.find('{')?;
    let end = raw.rfind('}')?;
    (start < end).then(|| &raw[start..=end])
}
