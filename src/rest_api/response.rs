//! # Response Formatting
//!
//! Small fixed bodies. Rows and the tree serialize themselves.

use serde::Serialize;

/// `{"status": "ok"}` returned by the super-lesson and section deletes
#[derive(Debug, Clone, Serialize)]
pub struct StatusResponse {
    pub status: &'static str,
}

impl StatusResponse {
    pub fn ok() -> Self {
        Self { status: "ok" }
    }
}

/// Confirmation body of the exercise update
#[derive(Debug, Clone, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_status_response_serialization() {
        let json = serde_json::to_value(StatusResponse::ok()).unwrap();
        assert_eq!(json, json!({"status": "ok"}));
    }

    #[test]
    fn test_message_response_serialization() {
        let json = serde_json::to_value(MessageResponse::new("Exercise updated")).unwrap();
        assert_eq!(json["message"], "Exercise updated");
    }
}
