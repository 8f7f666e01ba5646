//! Invocation events and the typed requests derived from them.

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::validation::{describe_errors, required_text};
use crate::{DriveboardError, Result};

/// Method label carried by an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestMethod {
    /// Create an entry, then list.
    Post,
    /// List entries.
    Get,
    /// Verify the password, then delete.
    Delete,
    /// Anything else.
    Other(String),
}

impl RequestMethod {
    /// Parse a method label. Labels are case-sensitive.
    pub fn parse(label: &str) -> Self {
        match label {
            "POST" => RequestMethod::Post,
            "GET" => RequestMethod::Get,
            "DELETE" => RequestMethod::Delete,
            other => RequestMethod::Other(other.to_string()),
        }
    }

    /// Get the label.
    pub fn as_str(&self) -> &str {
        match self {
            RequestMethod::Post => "POST",
            RequestMethod::Get => "GET",
            RequestMethod::Delete => "DELETE",
            RequestMethod::Other(label) => label,
        }
    }
}

impl std::fmt::Display for RequestMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A structured invocation: method label plus payload fields.
///
/// JSON form: `{"httpMethod": "DELETE", "updated_id": "file/a.png", "password": "..."}`.
#[derive(Clone, Default, Deserialize, Serialize)]
pub struct BoardEvent {
    /// Method label. When absent, the transport's own method is used.
    #[serde(rename = "httpMethod", default, skip_serializing_if = "Option::is_none")]
    pub http_method: Option<String>,
    /// Entry title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Client-supplied key.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_id: Option<String>,
    /// Plaintext password.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

impl BoardEvent {
    /// Create an event with the given method label and no fields.
    pub fn new(method: impl Into<String>) -> Self {
        Self {
            http_method: Some(method.into()),
            ..Default::default()
        }
    }

    /// Set the title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set the client key.
    pub fn with_updated_id(mut self, updated_id: impl Into<String>) -> Self {
        self.updated_id = Some(updated_id.into());
        self
    }

    /// Set the password.
    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    /// Fill in the method label if the event does not carry one.
    pub fn or_method(mut self, method: &str) -> Self {
        if self.http_method.is_none() {
            self.http_method = Some(method.to_string());
        }
        self
    }

    /// Parsed method label (an absent label parses as an empty `Other`).
    pub fn method(&self) -> RequestMethod {
        RequestMethod::parse(self.http_method.as_deref().unwrap_or_default())
    }
}

impl std::fmt::Debug for BoardEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoardEvent")
            .field("http_method", &self.http_method)
            .field("title", &self.title)
            .field("updated_id", &self.updated_id)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

fn require(field: &str, value: Option<String>) -> Result<String> {
    value.ok_or_else(|| DriveboardError::Validation(format!("missing field: {field}")))
}

fn check<T: Validate>(request: T) -> Result<T> {
    request
        .validate()
        .map_err(|e| DriveboardError::Validation(describe_errors(&e)))?;
    Ok(request)
}

/// Validated payload of a create request.
#[derive(Validate)]
pub struct CreateEntryRequest {
    #[validate(
        length(max = 1000, message = "Must be at most 1000 characters"),
        custom(function = "required_text")
    )]
    pub title: String,
    #[validate(
        length(max = 1024, message = "Must be at most 1024 characters"),
        custom(function = "required_text")
    )]
    pub updated_id: String,
    #[validate(length(min = 1, max = 1024, message = "Must be 1 to 1024 characters"))]
    pub password: String,
}

impl TryFrom<BoardEvent> for CreateEntryRequest {
    type Error = DriveboardError;

    fn try_from(event: BoardEvent) -> Result<Self> {
        check(Self {
            password: require("password", event.password)?,
            title: require("title", event.title)?,
            updated_id: require("updated_id", event.updated_id)?,
        })
    }
}

/// Validated payload of a delete request.
#[derive(Validate)]
pub struct DeleteEntryRequest {
    #[validate(custom(function = "required_text"))]
    pub updated_id: String,
    #[validate(length(min = 1, message = "Must not be empty"))]
    pub password: String,
}

impl TryFrom<BoardEvent> for DeleteEntryRequest {
    type Error = DriveboardError;

    fn try_from(event: BoardEvent) -> Result<Self> {
        check(Self {
            updated_id: require("updated_id", event.updated_id)?,
            password: require("password", event.password)?,
        })
    }
}
