//! Structured replies returned by the dispatcher.

use serde_json::{json, Value};

use crate::DriveboardError;

/// CORS headers attached to listing replies.
pub const CORS_HEADERS: [(&str, &str); 3] = [
    ("Access-Control-Allow-Origin", "*"),
    (
        "Access-Control-Allow-Headers",
        "Content-Type,X-Amz-Date,Authorization,X-Api-Key,X-Amz-Security-Token",
    ),
    ("Access-Control-Allow-Methods", "OPTIONS,POST,GET"),
];

/// Outcome of one dispatched event.
#[derive(Debug, Clone, PartialEq)]
pub struct BoardReply {
    /// HTTP-style status code.
    pub status: u16,
    /// Short human-readable message.
    pub message: String,
    /// Optional payload.
    pub data: Option<Value>,
    /// Whether [`CORS_HEADERS`] accompany this reply.
    pub cors: bool,
}

impl BoardReply {
    /// Create a reply.
    pub fn new(status: u16, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            data: None,
            cors: false,
        }
    }

    /// Create a 200 reply with data.
    pub fn ok(message: impl Into<String>, data: Value) -> Self {
        Self::new(200, message).with_data(data)
    }

    /// Attach a payload.
    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }

    /// Attach the CORS headers.
    pub fn with_cors(mut self) -> Self {
        self.cors = true;
        self
    }

    /// Build the reply for a failed request.
    ///
    /// Deletion outcomes carry `{"success": "n"}` so clients can branch on the
    /// payload alone. Server-side faults are logged here and answered with a
    /// generic message.
    pub fn from_error(err: &DriveboardError) -> Self {
        if err.is_internal() {
            tracing::error!(error = %err, "Board request failed");
        } else {
            tracing::debug!(error = %err, "Board request rejected");
        }

        let reply = Self::new(err.status_code(), err.public_message());
        match err {
            DriveboardError::AuthMismatch
            | DriveboardError::NotFound(_)
            | DriveboardError::Ambiguous(_) => reply.with_data(success_flag(false)),
            _ => reply,
        }
    }

    /// The payload as JSON text, non-ASCII left unescaped.
    pub fn data_text(&self) -> Option<String> {
        self.data.as_ref().map(Value::to_string)
    }
}

/// `{"success": "y"}` or `{"success": "n"}`.
pub fn success_flag(success: bool) -> Value {
    json!({ "success": if success { "y" } else { "n" } })
}
