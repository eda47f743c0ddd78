//! Error handling for the API module

use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    /// The response body was not the JSON shape this console expects.
    #[error("Decoding error: {0}")]
    Decode(#[from] serde_json::Error),

    /// Reqwest error, typically related to network issues or request failures.
    #[error("Reqwest error: {0}")]
    Reqwest(#[from] reqwest::Error),

    /// The backend answered with a non-success status.
    #[error("HTTP error with status {status}: {message}")]
    Http { status: u16, message: String },
}

impl ApiError {
    pub async fn from_response(response: reqwest::Response) -> ApiError {
        let status = response.status();
        let message = match response.text().await {
            Ok(body) => extract_message(&body)
                .unwrap_or_else(|| status.canonical_reason().unwrap_or("").to_string()),
            Err(_) => "Failed to read response text".to_string(),
        };

        ApiError::Http {
            status: status.as_u16(),
            message,
        }
    }

    /// Text shown to the user when a mutating call fails: the backend's own
    /// message when there is one, the transport error otherwise.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Http { message, .. } if !message.is_empty() => message.clone(),
            ApiError::Http { status, .. } => format!("Request failed with status {}", status),
            ApiError::Reqwest(e) => e.to_string(),
            ApiError::Decode(e) => format!("Unexpected response: {}", e),
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Http { status, .. } => Some(*status),
            ApiError::Reqwest(e) => e.status().map(|s| s.as_u16()),
            ApiError::Decode(_) => None,
        }
    }
}

/// Pulls the human message out of an error body.
///
/// The backend answers `{"detail": "..."}`; validation failures carry a
/// structured `detail`, which is passed through as JSON text. Bodies that are
/// not JSON are returned as-is.
fn extract_message(body: &str) -> Option<String> {
    let body = body.trim();
    if body.is_empty() {
        return None;
    }
    let Ok(json) = serde_json::from_str::<Value>(body) else {
        return Some(body.to_string());
    };
    let field = json.get("detail").or_else(|| json.get("error"));
    match field {
        Some(Value::String(message)) => Some(message.clone()),
        Some(other) => Some(other.to_string()),
        None => Some(body.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detail_is_passed_through_verbatim() {
        assert_eq!(
            extract_message(r#"{"detail": "Campaign is not in draft status"}"#).as_deref(),
            Some("Campaign is not in draft status")
        );
    }

    #[test]
    fn test_error_field_is_used_when_detail_missing() {
        assert_eq!(
            extract_message(r#"{"error": "LinkedIn session expired"}"#).as_deref(),
            Some("LinkedIn session expired")
        );
    }

    #[test]
    fn test_structured_detail_becomes_json_text() {
        let message = extract_message(r#"{"detail": [{"msg": "field required"}]}"#).unwrap();
        assert!(message.contains("field required"));
    }

    #[test]
    fn test_plain_and_empty_bodies() {
        assert_eq!(
            extract_message("Bad Gateway\n").as_deref(),
            Some("Bad Gateway")
        );
        assert_eq!(extract_message("   "), None);
    }

    #[test]
    fn test_user_message_prefers_backend_text() {
        let error = ApiError::Http {
            status: 400,
            message: "Template not found".to_string(),
        };
        assert_eq!(error.user_message(), "Template not found");
        assert_eq!(error.status(), Some(400));

        let empty = ApiError::Http {
            status: 502,
            message: String::new(),
        };
        assert_eq!(empty.user_message(), "Request failed with status 502");
    }
}
