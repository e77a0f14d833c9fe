//! Decoders for payloads embedded in inline `<script>` text.
//!
//! These carve values out of script bodies with regexes: JSON islands
//! (`var o = {...};`), quoted literals (`emvideo = "...";`) and string tokens
//! spliced into URL templates. Callers are expected to gate each decoder on a
//! cheap substring check first so unrelated scripts never reach the regex.
//!
//! Nothing here returns an error to the pipeline: a malformed island is logged
//! and reported as absent.

use regex::Regex;
use serde_json::Value;
use tracing::debug;

/// First capture group of `re` in `text`.
pub fn capture<'t>(re: &Regex, text: &'t str) -> Option<&'t str> {
    re.captures(text)?.get(1).map(|m| m.as_str())
}

/// Every first-group capture of `re` in `text`, in order of appearance.
pub fn capture_all<'t>(re: &Regex, text: &'t str) -> Vec<&'t str> {
    re.captures_iter(text)
        .filter_map(|c| c.get(1).map(|m| m.as_str()))
        .collect()
}

/// Parse a JSON island. A malformed payload is logged and yields `None`.
pub fn decode_island(raw: &str) -> Option<Value> {
    match serde_json::from_str::<Value>(raw.trim()) {
        Ok(v) => Some(v),
        Err(e) => {
            debug!(error = %e, payload = %crate::utils::truncate_for_log(raw, 120), "Skipping malformed JSON island");
            None
        }
    }
}

/// Locate the island captured by `re` inside `text` and parse it.
pub fn decode_captured_island(re: &Regex, text: &str) -> Option<Value> {
    capture(re, text).and_then(decode_island)
}

/// String at JSON `pointer`, trimmed. Numbers are rendered as text so rating
/// values published either way are both accepted. Empty strings count as absent.
pub fn str_at(value: &Value, pointer: &str) -> Option<String> {
    let s = match value.pointer(pointer)? {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        _ => return None,
    };
    (!s.is_empty()).then_some(s)
}

/// Interleave literal `fragments` with `tokens`:
/// `f0 + t0 + f1 + t1 + ... + fN`. Requires exactly one more fragment than tokens.
pub fn splice(fragments: &[&str], tokens: &[&str]) -> Option<String> {
    if fragments.len() != tokens.len() + 1 {
        return None;
    }
    let mut out = String::from(fragments[0]);
    for (token, fragment) in tokens.iter().zip(&fragments[1..]) {
        out.push_str(token);
        out.push_str(fragment);
    }
    Some(out)
}
