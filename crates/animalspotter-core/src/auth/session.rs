use std::fmt;

use reqwest::header::HeaderValue;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

/// Bearer token returned by the login endpoint as `{"token": "..."}`.
///
/// Decoding fails for tokens that could never be sent back, so a login body
/// carrying one is rejected instead of stored.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "LoginBody")]
pub struct SessionToken {
    pub token: String,
}

#[derive(Deserialize)]
struct LoginBody {
    token: String,
}

impl TryFrom<LoginBody> for SessionToken {
    type Error = String;

    fn try_from(body: LoginBody) -> Result<Self, Self::Error> {
        if body.token.trim().is_empty() {
            return Err("token is empty".to_string());
        }
        let token = SessionToken { token: body.token };
        HeaderValue::from_str(&token.bearer())
            .map_err(|_| "token is not a valid Authorization header value".to_string())?;
        Ok(token)
    }
}

impl SessionToken {
    /// Value for the `Authorization` header
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.token)
    }
}

impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionToken")
            .field("token", &"<redacted>")
            .finish()
    }
}

/// Holds the current token, if any.
///
/// Writes always replace the whole token. The lock is only held long enough
/// to copy or swap the value, never across a network call.
#[derive(Debug, Default)]
pub struct Session {
    token: RwLock<Option<SessionToken>>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the current token
    pub async fn token(&self) -> Option<SessionToken> {
        self.token.read().await.clone()
    }

    /// Replace the stored token
    pub async fn update(&self, token: SessionToken) {
        *self.token.write().await = Some(token);
    }

    /// Forget the stored token
    pub async fn clear(&self) {
        *self.token.write().await = None;
    }

    pub async fn is_authenticated(&self) -> bool {
        self.token.read().await.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token(value: &str) -> SessionToken {
        SessionToken {
            token: value.to_string(),
        }
    }

    #[tokio::test]
    async fn test_update_overwrites() {
        let session = Session::new();
        assert!(!session.is_authenticated().await);

        session.update(token("first")).await;
        session.update(token("second")).await;
        assert_eq!(session.token().await, Some(token("second")));

        session.clear().await;
        assert_eq!(session.token().await, None);
    }

    #[test]
    fn test_bearer_header_value() {
        assert_eq!(token("abc123").bearer(), "Bearer abc123");
    }

    #[test]
    fn test_decodes_login_body() {
        let parsed: SessionToken = serde_json::from_str(r#"{"token":"abc123"}"#).unwrap();
        assert_eq!(parsed.token, "abc123");
        assert!(serde_json::from_str::<SessionToken>(r#"{"jwt":"abc123"}"#).is_err());
        assert!(!format!("{:?}", parsed).contains("abc123"));
    }

    #[test]
    fn test_rejects_unsendable_tokens() {
        for body in [r#"{"token":"abc\ndef"}"#, r#"{"token":""}"#, r#"{"token":"  "}"#] {
            let err = serde_json::from_str::<SessionToken>(body).unwrap_err();
            assert!(err.is_data(), "{} should fail as data: {}", body, err);
        }
    }
}
