use axum::{
    extract::{rejection::PathRejection, Path, State},
    http::Uri,
    response::Response,
};

use crate::error::ApiError;
use crate::middleware::ApiResponse;
use crate::state::AppState;

/// GET /invoices/:id
///
/// Any id that is not an i64 is a 422, including segments that do not
/// percent-decode to UTF-8. The message echoes the segment as sent.
pub async fn get_invoice(
    State(state): State<AppState>,
    uri: Uri,
    raw_id: Result<Path<String>, PathRejection>,
) -> Result<Response, ApiError> {
    let id: i64 = match &raw_id {
        Ok(Path(raw)) => raw.parse().map_err(|e| {
            tracing::info!("rejected invoice id {:?}: {}", raw, e);
            invalid_id(raw)
        })?,
        Err(rejection) => {
            let segment = uri.path().rsplit('/').next().unwrap_or_default();
            tracing::info!("rejected invoice id {:?}: {}", segment, rejection);
            return Err(invalid_id(segment));
        }
    };

    let invoice = state.store.get_by_id(id).await.map_err(|e| {
        tracing::info!("lookup of invoice {} failed: {}", id, e);
        ApiError::from(e)
    })?;

    Ok(ApiResponse::ok(invoice).render(state.config.api.failure_policy))
}

fn invalid_id(raw: &str) -> ApiError {
    ApiError::unprocessable_entity(format!("Could not convert id={} to integer", raw))
}
