//! Best-effort message extraction from error response bodies

use fluree_vocab::media_types;

/// Pick a human-readable message for a failed request.
///
/// - `text/html` bodies (proxy error pages) are ignored in favour of `reason`
/// - a JSON object's `message` field is preferred when present
/// - anything else is returned as trimmed text; an empty body yields `reason`
pub fn decode_error_message(content_type: Option<&str>, body: &[u8], reason: &str) -> String {
    if content_type.map(media_types::essence).as_deref() == Some(media_types::HTML) {
        return reason.to_string();
    }
    if let Ok(serde_json::Value::Object(map)) = serde_json::from_slice::<serde_json::Value>(body) {
        if let Some(message) = map.get("message").and_then(|m| m.as_str()) {
            return message.to_string();
        }
    }
    let text = String::from_utf8_lossy(body);
    let text = text.trim();
    if text.is_empty() {
        reason.to_string()
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_html_uses_reason_phrase() {
        let msg = decode_error_message(
            Some("text/html; charset=utf-8"),
            b"<html><body>502 Bad Gateway</body></html>",
            "Bad Gateway",
        );
        assert_eq!(msg, "Bad Gateway");
    }

    #[test]
    fn test_json_message() {
        let msg = decode_error_message(
            Some("application/json"),
            br#"{"message":"bad query","status":400}"#,
            "Bad Request",
        );
        assert_eq!(msg, "bad query");
    }

    #[test]
    fn test_json_without_content_type() {
        let msg = decode_error_message(None, br#"{"message":"bad query"}"#, "Bad Request");
        assert_eq!(msg, "bad query");
    }

    #[test]
    fn test_plain_text_trimmed() {
        let msg = decode_error_message(Some("text/plain"), b"  parse error at line 3\n", "Bad Request");
        assert_eq!(msg, "parse error at line 3");
        assert_eq!(decode_error_message(None, b"   ", "Not Found"), "Not Found");
        assert_eq!(
            decode_error_message(Some("application/json"), br#"{"error":"x"}"#, "Bad Request"),
            r#"{"error":"x"}"#
        );
    }
}
