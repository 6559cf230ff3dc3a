use axum::http::{Method, Uri};

use crate::error::ApiError;

/// Anything the router does not know: 404 with `<METHOD> <request-uri>` as the body.
pub async fn route_not_found(method: Method, uri: Uri) -> ApiError {
    let target = uri.path_and_query().map(|p| p.as_str()).unwrap_or("/");
    tracing::info!("{} {} 404", method, target);
    ApiError::route_not_found(method.as_str(), target)
}
