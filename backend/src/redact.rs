//! Scrubs credentials out of text before it reaches the log.

use std::sync::LazyLock;

use regex::Regex;

static SENSITIVE_PATTERNS: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    [
        (r"(?i)sk_live_[a-zA-Z0-9]{24,}", "[STRIPE_SECRET_REDACTED]"),
        (r"(?i)pk_live_[a-zA-Z0-9]{24,}", "[STRIPE_PUBLIC_REDACTED]"),
        (r"(?i)sk_test_[a-zA-Z0-9]{24,}", "[STRIPE_TEST_SECRET_REDACTED]"),
        (r"(?i)rk_live_[a-zA-Z0-9]{24,}", "[STRIPE_RESTRICTED_REDACTED]"),
        (r#"(?i)"password"\s*:\s*"[^"]*""#, r#""password": "[REDACTED]""#),
        (r#"(?i)"token"\s*:\s*"[^"]*""#, r#""token": "[REDACTED]""#),
        (r"(?i)Bearer\s+[a-zA-Z0-9\-._~+/]+=*", "Bearer [REDACTED]"),
        (r"(?i)Authorization:\s*[^\s]+", "Authorization: [REDACTED]"),
    ]
    .into_iter()
    .map(|(pattern, replacement)| (Regex::new(pattern).expect("redaction pattern"), replacement))
    .collect()
});

pub fn sanitize_message(message: &str) -> String {
    let mut message = message.to_string();
    for (pattern, replacement) in SENSITIVE_PATTERNS.iter() {
        message = pattern.replace_all(&message, *replacement).into_owned();
    }
    message
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn redacts_bearer_tokens() {
        let out = sanitize_message("upstream said: bearer abc.DEF-123== rejected");
        assert_eq!(out, "upstream said: Bearer [REDACTED] rejected");
    }

    #[test]
    fn redacts_json_secrets() {
        let out = sanitize_message(r#"{"user": "x", "password" : "hunter2", "token":"t0k"}"#);
        assert!(!out.contains("hunter2"));
        assert!(!out.contains("t0k"));
        assert!(out.contains(r#""password": "[REDACTED]""#));
    }

    #[test]
    fn redacts_payment_keys_and_auth_headers() {
        let key = format!("sk_live_{}", "a".repeat(24));
        let out = sanitize_message(&format!("key={key} Authorization: s3cr3tvalue"));
        assert!(out.contains("[STRIPE_SECRET_REDACTED]"));
        assert!(out.contains("Authorization: [REDACTED]"));
        assert!(!out.contains("s3cr3tvalue"));
    }

    #[test]
    fn leaves_plain_text_alone() {
        assert_eq!(sanitize_message("examiner:\"jane doe\""), "examiner:\"jane doe\"");
    }
}
