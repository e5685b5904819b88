//! Error Types
//!
//! One error enum for every failure the dashboard can surface: transport,
//! backend-reported business errors, client-side validation, and auth expiry.

use serde_json::Value;
use thiserror::Error;
use wasm_bindgen::JsValue;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApiError {
    /// Network failure or a browser API call that threw
    #[error("Network error: {0}")]
    Transport(String),

    /// Non-2xx response from the backend
    #[error("{message}")]
    Business { status: u16, message: String },

    /// Asset or record does not exist (404)
    #[error("Not found: {0}")]
    NotFound(String),

    /// Rejected before any request was sent
    #[error("{0}")]
    Validation(String),

    /// Session expired (401); storage has already been cleared
    #[error("Session expired")]
    Unauthorized,

    /// Response body did not have the expected shape
    #[error("Unexpected response: {0}")]
    Decode(String),
}

impl ApiError {
    /// Build a `Business` error from a failed response body
    pub fn from_response(status: u16, body: &Value) -> Self {
        let message = extract_message(body)
            .unwrap_or_else(|| generic_message(status).to_string());
        Self::Business { status, message }
    }

    /// Map a failed (non-401) response. A 404 keeps the backend's message
    /// when it sent one and is `NotFound` otherwise.
    pub fn from_status(status: u16, url: &str, body: &Value) -> Self {
        if status == 404 && extract_message(body).is_none() {
            return Self::NotFound(url.to_string());
        }
        Self::from_response(status, body)
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Text shown in the error toast
    pub fn user_message(&self) -> String {
        match self {
            Self::Transport(_) => "Could not reach the server, please retry".to_string(),
            Self::NotFound(_) => "The requested file does not exist".to_string(),
            Self::Decode(_) => "The server sent an unexpected response".to_string(),
            other => other.to_string(),
        }
    }
}

impl From<JsValue> for ApiError {
    fn from(value: JsValue) -> Self {
        let text = value
            .as_string()
            .unwrap_or_else(|| format!("{:?}", value));
        Self::Transport(text)
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}

/// Structured message from `{message}`, `{error}` or `{data: {message}}`
fn extract_message(body: &Value) -> Option<String> {
    fn non_blank(v: Option<&Value>) -> Option<&str> {
        v.and_then(Value::as_str).map(str::trim).filter(|m| !m.is_empty())
    }
    ["message", "error", "msg"]
        .iter()
        .find_map(|key| non_blank(body.get(key)))
        .or_else(|| non_blank(body.get("data").and_then(|d| d.get("message"))))
        .map(String::from)
}

fn generic_message(status: u16) -> &'static str {
    match status {
        400 => "The request was rejected",
        403 => "You do not have permission for this action",
        409 => "The record was changed by someone else",
        413 => "The file is too large",
        415 => "This file type is not accepted",
        500..=599 => "Server error, please retry later",
        _ => "Request failed",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_business_message_extraction() {
        let err = ApiError::from_response(400, &json!({ "message": "Contract number exists" }));
        assert_eq!(err.user_message(), "Contract number exists");

        let err = ApiError::from_response(422, &json!({ "data": { "message": "Bad date" } }));
        assert_eq!(err.user_message(), "Bad date");

        let err = ApiError::from_response(400, &json!({ "error": "  " }));
        assert_eq!(err.user_message(), "The request was rejected");
    }

    #[test]
    fn test_blank_top_level_message_falls_through_to_data() {
        let body = json!({ "message": "", "data": { "message": "Contract already signed" } });
        let err = ApiError::from_response(400, &body);
        assert_eq!(err.user_message(), "Contract already signed");
    }

    #[test]
    fn test_404_keeps_backend_message() {
        let err = ApiError::from_status(404, "/api/contract/upload/9", &json!({ "message": "Contract 9 was removed" }));
        assert_eq!(err, ApiError::Business { status: 404, message: "Contract 9 was removed".into() });
        assert_eq!(err.user_message(), "Contract 9 was removed");

        let err = ApiError::from_status(404, "/api/qrcode/9", &Value::Null);
        assert_eq!(err, ApiError::NotFound("/api/qrcode/9".into()));

        let err = ApiError::from_status(500, "/api/contract", &json!({ "error": " " }));
        assert_eq!(err.user_message(), "Server error, please retry later");
    }

    #[test]
    fn test_generic_fallback() {
        let err = ApiError::from_response(503, &Value::Null);
        assert_eq!(
            err,
            ApiError::Business { status: 503, message: "Server error, please retry later".into() }
        );
    }

    #[test]
    fn test_validation_flag() {
        assert!(ApiError::Validation("x".into()).is_validation());
        assert!(!ApiError::Unauthorized.is_validation());
    }
}
