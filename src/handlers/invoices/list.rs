use axum::{extract::State, response::Response};
use tracing::Instrument;

use crate::error::ApiError;
use crate::middleware::ApiResponse;
use crate::state::AppState;

/// GET /invoices
///
/// The store query runs as its own task and is raced against
/// `api.list_timeout_ms`. When the deadline wins the caller gets 504 and the
/// task is detached rather than aborted: the query runs to completion and its
/// result is dropped, holding its pool connection until then.
pub async fn list_invoices(State(state): State<AppState>) -> Result<Response, ApiError> {
    let deadline = state.config.api.list_timeout();
    let store = state.store.clone();
    let query = tokio::spawn(async move { store.get_all().await }.in_current_span());

    match tokio::time::timeout(deadline, query).await {
        Err(_) => {
            tracing::warn!("list query exceeded {:?}, abandoning it", deadline);
            Err(ApiError::Timeout)
        }
        Ok(Err(join_error)) => {
            tracing::error!("list query task failed: {}", join_error);
            Err(ApiError::InternalServerError)
        }
        Ok(Ok(result)) => {
            let invoices = result?;
            Ok(ApiResponse::ok(invoices).render(state.config.api.failure_policy))
        }
    }
}
