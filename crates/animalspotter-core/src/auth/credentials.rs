use std::fmt;

use serde::Serialize;

/// Username and password for the signup and login endpoints.
///
/// Serialized as `{"username": ..., "password": ...}`. Built by the caller
/// and dropped once the request has been sent.
#[derive(Clone, Serialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Both fields must be non-empty before we bother the server
    pub fn is_complete(&self) -> bool {
        !self.username.trim().is_empty() && !self.password.is_empty()
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serializes_wire_field_names() {
        let creds = Credentials::new("joe", "hunter2");
        let json = serde_json::to_value(&creds).unwrap();
        assert_eq!(json, serde_json::json!({"username": "joe", "password": "hunter2"}));
    }

    #[test]
    fn test_debug_redacts_password() {
        let creds = Credentials::new("joe", "hunter2");
        let debug = format!("{:?}", creds);
        assert!(debug.contains("joe"));
        assert!(!debug.contains("hunter2"));
    }

    #[test]
    fn test_is_complete() {
        assert!(Credentials::new("joe", "pw").is_complete());
        assert!(!Credentials::new("  ", "pw").is_complete());
        assert!(!Credentials::new("joe", "").is_complete());
    }
}
