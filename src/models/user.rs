use serde::{Deserialize, Serialize};

/// Authenticated user profile as returned by the login endpoint and
/// persisted alongside the bearer token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub user_id: i64,
    pub username: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
}

impl User {
    /// Display name: "First Last" when both are set, falling back to the
    /// username.
    pub fn display_name(&self) -> String {
        match (&self.first_name, &self.last_name) {
            (Some(first), Some(last)) => format!("{} {}", first, last),
            (Some(first), None) => first.clone(),
            (None, Some(last)) => last.clone(),
            (None, None) => self.username.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(first: Option<&str>, last: Option<&str>) -> User {
        User {
            user_id: 1,
            username: "alice".to_string(),
            email: "alice@example.com".to_string(),
            first_name: first.map(String::from),
            last_name: last.map(String::from),
        }
    }

    #[test]
    fn test_display_name() {
        assert_eq!(user(Some("Alice"), Some("Smith")).display_name(), "Alice Smith");
        assert_eq!(user(Some("Alice"), None).display_name(), "Alice");
        assert_eq!(user(None, None).display_name(), "alice");
    }

    #[test]
    fn test_parse_login_payload_user() {
        let json = r#"{"user_id": 7, "username": "bob", "email": "b@x.com", "first_name": null, "last_name": null}"#;
        let parsed: User = serde_json::from_str(json).expect("Failed to parse user");
        assert_eq!(parsed.user_id, 7);
        assert_eq!(parsed.username, "bob");
        assert!(parsed.first_name.is_none());
    }
}
