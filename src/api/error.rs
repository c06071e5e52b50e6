use serde::Deserialize;
use thiserror::Error;

/// Maximum length for error response bodies carried in error messages
const MAX_ERROR_BODY_LENGTH: usize = 500;

#[derive(Error, Debug)]
pub enum ApiError {
    /// 401 from the service: the token is missing, invalid, or expired,
    /// or a credential check was rejected.
    #[error("{}", .detail.as_deref().unwrap_or("unauthorized"))]
    Unauthorized { detail: Option<String> },

    /// Any other 4xx rejection (duplicate registration, bad request, ...).
    #[error("{}", .detail.as_deref().unwrap_or("request rejected"))]
    Rejected { status: u16, detail: Option<String> },

    /// 5xx from the service.
    #[error("server error ({status})")]
    Server { status: u16, detail: Option<String> },

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

/// FastAPI-style error payload: `{"detail": "..."}`
#[derive(Deserialize)]
struct ErrorBody {
    detail: Option<String>,
}

impl ApiError {
    /// Truncate a response body to avoid carrying excessive data.
    /// The cut is clamped to a char boundary; bodies are not always ASCII.
    fn truncate_body(body: &str) -> String {
        if body.len() <= MAX_ERROR_BODY_LENGTH {
            return body.to_string();
        }
        let mut cut = MAX_ERROR_BODY_LENGTH;
        while !body.is_char_boundary(cut) {
            cut -= 1;
        }
        format!(
            "{}... (truncated, {} total bytes)",
            &body[..cut],
            body.len()
        )
    }

    /// Extract the service-provided detail message, if the body carries one.
    fn extract_detail(body: &str) -> Option<String> {
        serde_json::from_str::<ErrorBody>(body)
            .ok()
            .and_then(|b| b.detail)
    }

    pub fn from_status(status: reqwest::StatusCode, body: &str) -> Self {
        let detail = Self::extract_detail(body);
        match status.as_u16() {
            401 => ApiError::Unauthorized { detail },
            400..=499 => ApiError::Rejected {
                status: status.as_u16(),
                detail,
            },
            500..=599 => ApiError::Server {
                status: status.as_u16(),
                detail,
            },
            _ => ApiError::InvalidResponse(format!(
                "Status {}: {}",
                status,
                Self::truncate_body(body)
            )),
        }
    }

    /// Normalized message for a failed login/registration: the remote
    /// detail when present, else the generic fallback, else the transport
    /// error.
    pub(crate) fn auth_message(&self, fallback: &str) -> String {
        match self {
            ApiError::Unauthorized { detail }
            | ApiError::Rejected { detail, .. }
            | ApiError::Server { detail, .. } => {
                detail.clone().unwrap_or_else(|| fallback.to_string())
            }
            ApiError::Network(e) => e.to_string(),
            ApiError::InvalidResponse(_) => fallback.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    #[test]
    fn test_from_status_extracts_detail() {
        let err = ApiError::from_status(StatusCode::UNAUTHORIZED, r#"{"detail":"Invalid credentials"}"#);
        match err {
            ApiError::Unauthorized { detail } => {
                assert_eq!(detail.as_deref(), Some("Invalid credentials"));
            }
            other => panic!("Expected Unauthorized, got {:?}", other),
        }
    }

    #[test]
    fn test_from_status_without_detail() {
        let err = ApiError::from_status(StatusCode::BAD_REQUEST, "not json");
        match err {
            ApiError::Rejected { status, detail } => {
                assert_eq!(status, 400);
                assert!(detail.is_none());
            }
            other => panic!("Expected Rejected, got {:?}", other),
        }
    }

    #[test]
    fn test_auth_message_prefers_detail_then_fallback() {
        let with_detail = ApiError::Unauthorized {
            detail: Some("Incorrect username or password".to_string()),
        };
        assert_eq!(with_detail.auth_message("Login failed"), "Incorrect username or password");

        let without = ApiError::Server {
            status: 500,
            detail: None,
        };
        assert_eq!(without.auth_message("Login failed"), "Login failed");
    }

    #[test]
    fn test_truncate_body() {
        let long = "x".repeat(600);
        let err = ApiError::from_status(StatusCode::MULTIPLE_CHOICES, &long);
        let msg = err.to_string();
        assert!(msg.contains("truncated"));
        assert!(msg.len() < 620);
    }

    #[test]
    fn test_truncate_body_respects_char_boundaries() {
        // 3 bytes per char, so the nominal cut lands mid-character.
        let long = "€".repeat(200);
        let err = ApiError::from_status(StatusCode::MULTIPLE_CHOICES, &long);
        let msg = err.to_string();
        assert!(msg.contains("truncated"));
        assert!(msg.contains("600 total bytes"));
    }
}
