//! Lenient JSON object extraction from model replies
//!
//! Models wrap JSON in prose or markdown fences, and sometimes echo a small
//! example object before the real answer. We scan for balanced top-level
//! braces, skipping braces inside string literals, and return the largest
//! candidate that parses as a JSON object. A `{` that is never closed means
//! the reply was cut off, and nothing is returned.

use serde_json::Value;

/// Locate and parse the largest well-formed JSON object embedded in `text`
pub fn extract_json_object(text: &str) -> Option<Value> {
    let bytes = text.as_bytes();
    let mut start = 0;
    let mut best: Option<(usize, Value)> = None;

    while let Some(offset) = text[start..].find('{') {
        let open = start + offset;
        let close = matching_brace(bytes, open)?;

        match serde_json::from_str(&text[open..=close]) {
            Ok(value @ Value::Object(_)) => {
                let span = close - open;
                if best.as_ref().map_or(true, |(len, _)| span > *len) {
                    best = Some((span, value));
                }
                start = close + 1;
            }
            // Not JSON (e.g. `{a, b}` in prose); objects may still sit inside it
            _ => start = open + 1,
        }
    }

    best.map(|(_, value)| value)
}

/// Index of the `}` closing the `{` at `open`, honoring JSON string escapes
fn matching_brace(bytes: &[u8], open: usize) -> Option<usize> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, &b) in bytes.iter().enumerate().skip(open) {
        if in_string {
            match b {
                _ if escaped => escaped = false,
                b'\\' => escaped = true,
                b'"' => in_string = false,
                _ => {}
            }
            continue;
        }

        match b {
            b'"' => in_string = true,
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }

    None
}
