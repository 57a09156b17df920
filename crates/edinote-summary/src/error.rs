use crate::provider::ProviderId;
use serde_json::Value;

const MAX_DETAIL_CHARS: usize = 300;

/// Every way a completion request can fail.
///
/// The viewer shows [`user_message`](Self::user_message); the raw response
/// body is kept for logs only.
#[derive(Debug, thiserror::Error)]
pub enum CompletionError {
    #[error("provider returned HTTP {status}: {detail}")]
    Http {
        status: u16,
        detail: String,
        body: String,
    },
    #[error("network error: {0}")]
    Network(String),
    #[error("request timed out")]
    Timeout,
    #[error("invalid response: {0}")]
    InvalidResponse(String),
    #[error("no API key configured for {0}")]
    MissingCredential(ProviderId),
    #[error("request cancelled")]
    Cancelled,
    #[error("configuration error: {0}")]
    Config(String),
}

impl CompletionError {
    /// Build an HTTP failure from a status code and the raw response body.
    pub fn http(status: u16, body: impl Into<String>) -> Self {
        let body = body.into();
        Self::Http {
            status,
            detail: extract_error_detail(&body),
            body,
        }
    }

    /// Best-effort one-line detail.
    pub fn detail(&self) -> String {
        match self {
            Self::Http { detail, .. } => detail.clone(),
            Self::Network(d) | Self::InvalidResponse(d) | Self::Config(d) => d.clone(),
            Self::Timeout => "the provider did not answer in time".to_string(),
            Self::MissingCredential(p) => format!("no API key for {}", p.display_name()),
            Self::Cancelled => "the request was cancelled".to_string(),
        }
    }

    /// Short text suitable for showing in place of a summary.
    pub fn user_message(&self) -> String {
        match self {
            Self::MissingCredential(_) => {
                "Please select a provider and enter an API key.".to_string()
            }
            Self::Http { status, detail, .. } => {
                format!("Failed to generate summary: HTTP {status} - {detail}")
            }
            Self::Timeout => "Failed to generate summary: the request timed out.".to_string(),
            Self::Cancelled => "Summary request cancelled.".to_string(),
            other => format!("Failed to generate summary: {}", other.detail()),
        }
    }

    /// Raw response body, when the provider sent one.
    pub fn raw_body(&self) -> Option<&str> {
        match self {
            Self::Http { body, .. } => Some(body),
            _ => None,
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for CompletionError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else if err.is_decode() {
            Self::InvalidResponse(err.to_string())
        } else {
            Self::Network(err.to_string())
        }
    }
}

/// Pull a readable message out of a provider error payload.
///
/// Tries `error.message`, then `error` as a string, then `message`, then
/// falls back to the (truncated) body itself.
pub fn extract_error_detail(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return "empty response body".to_string();
    }

    if let Ok(v) = serde_json::from_str::<Value>(trimmed) {
        let found = v
            .pointer("/error/message")
            .and_then(Value::as_str)
            .or_else(|| v.get("error").and_then(Value::as_str))
            .or_else(|| v.get("message").and_then(Value::as_str))
            .map(str::trim)
            .filter(|s| !s.is_empty());
        if let Some(found) = found {
            return truncate(found);
        }
    }

    truncate(trimmed)
}

fn truncate(s: &str) -> String {
    if s.chars().count() <= MAX_DETAIL_CHARS {
        return s.to_string();
    }
    let mut out: String = s.chars().take(MAX_DETAIL_CHARS).collect();
    out.push_str("...");
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detail_extraction_order() {
        assert_eq!(
            extract_error_detail(r#"{"error":{"message":"quota exceeded","code":429}}"#),
            "quota exceeded"
        );
        assert_eq!(extract_error_detail(r#"{"error":"bad key"}"#), "bad key");
        assert_eq!(extract_error_detail(r#"{"message":"overloaded"}"#), "overloaded");
        assert_eq!(
            extract_error_detail("<html>Bad Gateway</html>"),
            "<html>Bad Gateway</html>"
        );
        assert_eq!(extract_error_detail("   "), "empty response body");
    }

    #[test]
    fn test_long_body_is_truncated() {
        let detail = extract_error_detail(&"x".repeat(1000));
        assert!(detail.ends_with("..."));
        assert_eq!(detail.chars().count(), MAX_DETAIL_CHARS + 3);
    }

    #[test]
    fn test_http_error_keeps_raw_body_out_of_user_message() {
        let body = r#"{"error":{"message":"internal"},"trace":"secret-stack"}"#;
        let err = CompletionError::http(500, body);
        assert_eq!(err.status(), Some(500));
        assert_eq!(err.raw_body(), Some(body));
        let msg = err.user_message();
        assert!(msg.contains("500"));
        assert!(msg.contains("internal"));
        assert!(!msg.contains("secret-stack"));
    }

    #[test]
    fn test_missing_credential_message() {
        let err = CompletionError::MissingCredential(ProviderId::Claude);
        assert!(err.user_message().contains("select a provider and enter an API key"));
        assert!(err.detail().contains("Claude"));
    }
}
