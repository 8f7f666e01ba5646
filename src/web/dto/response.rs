//! Response envelope.

use std::collections::BTreeMap;

use axum::{
    http::{HeaderName, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::board::{BoardReply, CORS_HEADERS};

/// Gateway response envelope.
///
/// `data` holds the payload as JSON text; callers parse it a second time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope {
    /// Status code, mirrored in the HTTP status line.
    pub status_code: u16,
    /// Message.
    pub body: String,
    /// JSON text of the payload.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
    /// Response headers, present on CORS replies.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headers: Option<BTreeMap<String, String>>,
}

impl Envelope {
    /// Envelope with a message only.
    pub fn message(status_code: u16, body: impl Into<String>) -> Self {
        Self {
            status_code,
            body: body.into(),
            data: None,
            headers: None,
        }
    }
}

impl From<&BoardReply> for Envelope {
    fn from(reply: &BoardReply) -> Self {
        let headers = reply.cors.then(|| {
            CORS_HEADERS
                .iter()
                .map(|(name, value)| (name.to_string(), value.to_string()))
                .collect()
        });

        Self {
            status_code: reply.status,
            body: reply.message.clone(),
            data: reply.data_text(),
            headers,
        }
    }
}

impl IntoResponse for BoardReply {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let mut response = (status, Json(Envelope::from(&self))).into_response();

        if self.cors {
            let headers = response.headers_mut();
            for (name, value) in CORS_HEADERS {
                if let Ok(name) = HeaderName::from_bytes(name.as_bytes()) {
                    headers.insert(name, HeaderValue::from_static(value));
                }
            }
        }

        response
    }
}
