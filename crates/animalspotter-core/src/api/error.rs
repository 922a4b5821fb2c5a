use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Failed to encode request body: {0}")]
    Encoding(#[source] serde_json::Error),

    #[error("Network error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Unexpected status {status}: {body}")]
    UnexpectedStatus { status: u16, body: String },

    #[error("Not logged in - authenticate first")]
    NoToken,

    #[error("Unauthorized - token was rejected")]
    InvalidToken,

    #[error("Response body was empty")]
    EmptyBody,

    #[error("Invalid response: {0}")]
    Decoding(#[source] serde_json::Error),

    #[error("Bad URL: {0}")]
    BadUrl(String),

    #[error("Could not decode image: {0}")]
    ImageDecoding(#[from] image::ImageError),
}

/// Maximum length for error response bodies in error messages
const MAX_ERROR_BODY_LENGTH: usize = 500;

impl ApiError {
    /// Truncate a response body to avoid logging excessive data
    fn truncate_body(body: &str) -> String {
        if body.len() <= MAX_ERROR_BODY_LENGTH {
            return body.to_string();
        }
        let mut end = MAX_ERROR_BODY_LENGTH;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}... (truncated, {} total bytes)", &body[..end], body.len())
    }

    /// Non-200 on the account endpoints, where every status is just unexpected.
    pub fn unexpected_status(status: reqwest::StatusCode, body: &str) -> Self {
        ApiError::UnexpectedStatus {
            status: status.as_u16(),
            body: Self::truncate_body(body),
        }
    }

    /// Non-success on a bearer-authenticated endpoint.
    pub fn from_status(status: reqwest::StatusCode, body: &str) -> Self {
        match status.as_u16() {
            401 => ApiError::InvalidToken,
            _ => Self::unexpected_status(status, body),
        }
    }

    /// The caller has to (re)authenticate before trying again.
    pub fn requires_login(&self) -> bool {
        matches!(self, ApiError::NoToken | ApiError::InvalidToken)
    }

    /// Network or server trouble; the same call may succeed later.
    ///
    /// This is the "transport" kind as a whole: a failed connection
    /// (`Transport`) and an unexpected status (`UnexpectedStatus`) both
    /// count. Match on this rather than on `Transport(_)` alone.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            ApiError::Transport(_) | ApiError::UnexpectedStatus { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    #[test]
    fn test_from_status_classifies_401() {
        assert!(matches!(
            ApiError::from_status(StatusCode::UNAUTHORIZED, ""),
            ApiError::InvalidToken
        ));
        assert!(matches!(
            ApiError::from_status(StatusCode::INTERNAL_SERVER_ERROR, "boom"),
            ApiError::UnexpectedStatus { status: 500, ref body } if body == "boom"
        ));
        // The account endpoints never translate 401 into a token error
        assert!(matches!(
            ApiError::unexpected_status(StatusCode::UNAUTHORIZED, ""),
            ApiError::UnexpectedStatus { status: 401, .. }
        ));
    }

    #[test]
    fn test_truncate_body() {
        let long = "x".repeat(MAX_ERROR_BODY_LENGTH + 20);
        let truncated = ApiError::truncate_body(&long);
        assert!(truncated.starts_with(&"x".repeat(MAX_ERROR_BODY_LENGTH)));
        assert!(truncated.ends_with("(truncated, 520 total bytes)"));

        // Never split a multi-byte character
        let wide = "é".repeat(MAX_ERROR_BODY_LENGTH);
        let truncated = ApiError::truncate_body(&wide);
        assert!(truncated.contains("truncated"));
    }

    #[test]
    fn test_error_groups() {
        assert!(ApiError::NoToken.requires_login());
        assert!(ApiError::InvalidToken.requires_login());
        assert!(!ApiError::EmptyBody.requires_login());

        let status = ApiError::UnexpectedStatus {
            status: 503,
            body: String::new(),
        };
        assert!(status.is_transient());
        assert!(!status.requires_login());
        assert!(!ApiError::EmptyBody.is_transient());
        assert!(!ApiError::BadUrl("nope".into()).is_transient());
    }
}
