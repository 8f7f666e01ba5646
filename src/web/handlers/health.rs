//! Health endpoint.

use axum::extract::State;
use std::sync::Arc;

use crate::web::error::ApiError;
use crate::web::handlers::AppState;

/// GET /health - Report whether the database answers.
pub async fn health_check(State(state): State<Arc<AppState>>) -> Result<&'static str, ApiError> {
    state.db.health_check().await.map_err(|e| {
        tracing::warn!(error = %e, "Health check failed");
        ApiError::service_unavailable("database unavailable")
    })?;
    Ok("OK")
}
