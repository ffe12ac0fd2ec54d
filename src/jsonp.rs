//! JSONP payload extraction.
//!
//! The Qase reporter writes every resource as `callback(<json>);` so the
//! report can be opened from `file://` without a server. Bare JSON is
//! accepted too.

use serde::de::DeserializeOwned;

/// Return the JSON text embedded in a JSONP payload.
pub fn extract(payload: &str) -> Result<&str, String> {
    let trimmed = payload.trim_start_matches('\u{feff}').trim();
    if trimmed.is_empty() {
        return Err("empty payload".to_string());
    }

    if trimmed.starts_with('{') || trimmed.starts_with('[') {
        return Ok(trimmed);
    }

    let open = trimmed
        .find('(')
        .ok_or_else(|| "missing opening parenthesis".to_string())?;
    let callee = trimmed[..open].trim();
    if callee.is_empty() || !callee.chars().all(is_callee_char) {
        return Err(format!("invalid callback name: {:?}", callee));
    }

    let body = trimmed.strip_suffix(';').unwrap_or(trimmed).trim_end();
    let close = body
        .strip_suffix(')')
        .ok_or_else(|| "missing closing parenthesis".to_string())?;

    let inner = close[open + 1..].trim();
    if inner.is_empty() {
        return Err("empty callback argument".to_string());
    }
    Ok(inner)
}

/// Extract and deserialize a JSONP payload.
pub fn parse<T: DeserializeOwned>(payload: &str) -> Result<T, String> {
    let json = extract(payload)?;
    serde_json::from_str(json).map_err(|e| e.to_string())
}

fn is_callee_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '$' || c == '.'
}
