//! Request body parsing.

use axum::body::Bytes;

use crate::board::BoardEvent;
use crate::web::error::ApiError;

/// Parse a request body into an event.
///
/// An empty body is an event with no fields, so `GET /board` needs no payload.
pub fn parse_event(body: &Bytes) -> Result<BoardEvent, ApiError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(BoardEvent::default());
    }

    serde_json::from_slice(body)
        .map_err(|e| ApiError::bad_request(format!("invalid request body: {}", e)))
}
