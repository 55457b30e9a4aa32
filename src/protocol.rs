//! Wire protocol shared by the HTTP and WebSocket surfaces.
//!
//! Both surfaces answer with the same envelope shape; the WebSocket
//! additionally greets new clients with a status envelope.

use serde::{Deserialize, Serialize};

/// Model label reported to clients on every envelope.
pub const MODEL_LABEL: &str = "realtutor-ai";

/// Envelopes the server emits.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "lowercase")]
pub enum ServerEnvelope {
    /// Connection greeting on the WebSocket surface.
    Status(StatusData),
    /// A processed completion (or an error-shaped message).
    Response(ResponseData),
}

impl ServerEnvelope {
    /// Status envelope sent when a WebSocket client connects.
    pub fn connected() -> Self {
        Self::Status(StatusData {
            connected: true,
            model: MODEL_LABEL.to_string(),
        })
    }

    /// Response envelope carrying a processed message.
    pub fn response(message: impl Into<String>) -> Self {
        Self::Response(ResponseData {
            message: message.into(),
            model: MODEL_LABEL.to_string(),
        })
    }
}

/// Payload of a status envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusData {
    pub connected: bool,
    pub model: String,
}

/// Payload of a response envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponseData {
    pub message: String,
    pub model: String,
}

/// Messages a WebSocket client can send.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "lowercase")]
pub enum ClientMessage {
    /// Editor inactivity report: code text plus an optional error.
    Inactivity(InactivityData),
}

/// Payload of an inactivity message.
#[derive(Debug, Clone, Deserialize)]
pub struct InactivityData {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub language: String,
    /// When present and non-empty, routes to error explanation instead of
    /// inactivity suggestions.
    #[serde(default)]
    pub error: Option<String>,
    #[serde(rename = "fileName", default = "default_file_name")]
    pub file_name: String,
}

/// Body of `POST /generate`.
#[derive(Debug, Clone, Deserialize)]
pub struct GenerateRequest {
    #[serde(default)]
    pub prompt: String,
    #[serde(default)]
    pub language: String,
}

/// Body of `POST /analyze`.
#[derive(Debug, Clone, Deserialize)]
pub struct AnalyzeRequest {
    #[serde(rename = "userMessage", default)]
    pub user_message: String,
    #[serde(rename = "codeContext", default)]
    pub code_context: String,
    #[serde(default)]
    pub language: String,
    #[serde(rename = "fileName", default = "default_file_name")]
    pub file_name: String,
    /// When non-empty, the request runs the project-analysis path.
    #[serde(rename = "projectFilesDetailed", default)]
    pub project_files: Vec<ProjectFile>,
}

/// One project file in an analysis request.
#[derive(Debug, Clone, Deserialize)]
pub struct ProjectFile {
    #[serde(default)]
    pub filename: String,
    #[serde(default)]
    pub content: String,
}

fn default_file_name() -> String {
    "unknown".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_envelope_shape() {
        let json = serde_json::to_string(&ServerEnvelope::connected()).unwrap();
        assert!(json.contains(r#""type":"status""#));
        assert!(json.contains(r#""connected":true"#));
        assert!(json.contains(r#""model":"realtutor-ai""#));
    }

    #[test]
    fn test_response_envelope_shape() {
        let json = serde_json::to_string(&ServerEnvelope::response("hello")).unwrap();
        assert!(json.contains(r#""type":"response""#));
        assert!(json.contains(r#""message":"hello""#));
        assert!(json.contains(r#""model":"realtutor-ai""#));
    }

    #[test]
    fn test_inactivity_message_deserializes() {
        let json = r#"{
            "type": "inactivity",
            "data": { "text": "def f(): pass", "language": "python",
                      "error": "SyntaxError", "fileName": "a.py" }
        }"#;
        let ClientMessage::Inactivity(data) = serde_json::from_str(json).unwrap();
        assert_eq!(data.text, "def f(): pass");
        assert_eq!(data.language, "python");
        assert_eq!(data.error.as_deref(), Some("SyntaxError"));
        assert_eq!(data.file_name, "a.py");
    }

    #[test]
    fn test_inactivity_message_defaults() {
        let json = r#"{ "type": "inactivity", "data": {} }"#;
        let ClientMessage::Inactivity(data) = serde_json::from_str(json).unwrap();
        assert!(data.text.is_empty());
        assert!(data.error.is_none());
        assert_eq!(data.file_name, "unknown");
    }

    #[test]
    fn test_unknown_message_type_rejected() {
        let json = r#"{ "type": "ping", "data": {} }"#;
        assert!(serde_json::from_str::<ClientMessage>(json).is_err());
    }

    #[test]
    fn test_analyze_request_camel_case_fields() {
        let json = r#"{
            "userMessage": "review this",
            "codeContext": "x = 1",
            "fileName": "a.py",
            "projectFilesDetailed": [{ "filename": "a.py", "content": "x = 1" }]
        }"#;
        let req: AnalyzeRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.user_message, "review this");
        assert_eq!(req.code_context, "x = 1");
        assert_eq!(req.file_name, "a.py");
        assert_eq!(req.project_files.len(), 1);
        assert_eq!(req.project_files[0].filename, "a.py");
    }

    #[test]
    fn test_analyze_request_defaults() {
        let req: AnalyzeRequest = serde_json::from_str("{}").unwrap();
        assert!(req.user_message.is_empty());
        assert_eq!(req.file_name, "unknown");
        assert!(req.project_files.is_empty());
    }
}
