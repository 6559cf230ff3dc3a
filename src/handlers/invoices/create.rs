use axum::{body::Body, extract::State, response::Response, Extension};

use crate::database::NewInvoice;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, CorrelationId};
use crate::state::AppState;

/// POST /invoices
///
/// The body is capped at `api.max_request_size_bytes`; anything longer is
/// rejected before parsing. A client-supplied `id` is ignored.
pub async fn create_invoice(
    State(state): State<AppState>,
    Extension(correlation_id): Extension<CorrelationId>,
    body: Body,
) -> Result<Response, ApiError> {
    let limit = state.config.api.max_request_size_bytes;
    let bytes = axum::body::to_bytes(body, limit).await.map_err(|e| {
        tracing::info!("could not read request body: {}", e);
        ApiError::unprocessable_entity(format!("Request body is unreadable or exceeds {} bytes", limit))
    })?;

    let new_invoice: NewInvoice = serde_json::from_slice(&bytes).map_err(|e| {
        tracing::info!("rejected invoice payload: {}", e);
        ApiError::invalid_json(&e)
    })?;

    let invoice = state.store.create(new_invoice).await?;
    tracing::info!("created invoice ID={} for request {}", invoice.id, correlation_id.as_str());

    Ok(ApiResponse::created(invoice).render(state.config.api.failure_policy))
}
