//! Board endpoint.

use axum::{body::Bytes, extract::State, http::Method};
use std::sync::Arc;

use crate::board::{BoardReply, Dispatcher};
use crate::web::dto::parse_event;
use crate::web::error::ApiError;
use crate::web::handlers::AppState;

/// ANY /board - Dispatch a board event.
///
/// The body's `httpMethod` selects the operation. Without one, the HTTP
/// method is used, so both `POST /board {"httpMethod":"GET"}` and a bare
/// `GET /board` list entries.
pub async fn handle_board(
    State(state): State<Arc<AppState>>,
    method: Method,
    body: Bytes,
) -> Result<BoardReply, ApiError> {
    let event = parse_event(&body)
        .map_err(|err| {
            tracing::debug!(
                code = ?err.code(),
                reason = err.message(),
                "Rejected board request body"
            );
            err
        })?
        .or_method(method.as_str());
    Ok(Dispatcher::new(state.db.pool()).dispatch(event).await)
}
