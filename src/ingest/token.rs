//! Shared-secret check for the ingestion webhook
//!
//! The automation platform passes the secret as a `token` query parameter:
//!
//! ```bash
//! curl -X POST "http://localhost:8000/webhooks/n8n?token=$FLOWWATCH_TOKEN" \
//!   -H "Content-Type: application/json" \
//!   -d '{"workflow_name":"Sync Orders","error_message":"timeout calling API"}'
//! ```

use std::fmt;

/// Configured ingestion secret
///
/// An empty secret never authenticates anything; there is no
/// "auth disabled" mode.
#[derive(Clone, Default)]
pub struct IngestToken {
    secret: String,
}

impl IngestToken {
    /// Surrounding whitespace is trimmed, as env files often carry a
    /// trailing newline
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into().trim().to_string(),
        }
    }

    pub fn is_configured(&self) -> bool {
        !self.secret.is_empty()
    }

    /// Exact string comparison against the supplied token
    pub fn verify(&self, supplied: Option<&str>) -> bool {
        if !self.is_configured() {
            return false;
        }
        supplied.map_or(false, |token| token == self.secret)
    }
}

impl fmt::Debug for IngestToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IngestToken")
            .field("configured", &self.is_configured())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matching_token() {
        let token = IngestToken::new("s3cret");
        assert!(token.verify(Some("s3cret")));
    }

    #[test]
    fn test_wrong_or_missing_token() {
        let token = IngestToken::new("s3cret");
        assert!(!token.verify(Some("S3CRET")));
        assert!(!token.verify(Some("s3cret ")));
        assert!(!token.verify(Some("")));
        assert!(!token.verify(None));
    }

    #[test]
    fn test_empty_secret_rejects_everything() {
        let token = IngestToken::new("");
        assert!(!token.is_configured());
        assert!(!token.verify(Some("")));
        assert!(!token.verify(Some("anything")));
        assert!(!token.verify(None));
    }

    #[test]
    fn test_debug_hides_secret() {
        let rendered = format!("{:?}", IngestToken::new("s3cret"));
        assert!(!rendered.contains("s3cret"));
    }
}
