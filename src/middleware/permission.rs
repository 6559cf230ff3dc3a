use axum::{
    extract::{MatchedPath, Request, State},
    middleware::Next,
    response::Response,
};

use super::auth::VerifiedClaims;
use super::response::contract_violation;
use crate::error::ApiError;
use crate::routes::required_permission;
use crate::state::AppState;

/// Route-level gate: looks the matched route up in the permission table and
/// requires the named claim to be `true`. Routes without an entry pass through.
pub async fn permission_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let required = request
        .extensions()
        .get::<MatchedPath>()
        .and_then(|path| required_permission(request.method(), path.as_str()));

    if let Some(permission) = required {
        let Some(VerifiedClaims(claims)) = request.extensions().get::<VerifiedClaims>() else {
            return Err(contract_violation(
                state.config.api.failure_policy,
                "claims not found in request extensions",
            ));
        };

        if !claims.allows(permission.as_str()) {
            tracing::info!("operation not permitted: missing claim {}", permission);
            return Err(ApiError::PermissionDenied);
        }
    }

    Ok(next.run(request).await)
}
