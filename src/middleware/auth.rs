use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};

use crate::auth::ClaimSet;
use crate::error::ApiError;
use crate::state::AppState;

/// Verified permissions of the caller, keyed by this crate-private type in the
/// request extensions.
#[derive(Clone, Debug)]
pub(crate) struct VerifiedClaims(pub(crate) ClaimSet);

/// JWT authentication middleware: the only gate between the network and the
/// handlers. Rejects with 401 or attaches the caller's claim set.
pub async fn jwt_auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let claims = {
        let header = match request.headers().get(AUTHORIZATION) {
            Some(value) => Some(value.to_str().map_err(|_| ApiError::InvalidToken)?),
            None => None,
        };
        state.verifier.verify_header(header)?
    };

    request.extensions_mut().insert(VerifiedClaims(claims.permissions()));

    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::StatusCode, routing::get, Extension, Router};
    use chrono::Duration;
    use tower::ServiceExt;

    use crate::auth::{generate_jwt, Permission};
    use crate::config::AppConfig;
    use crate::database::MemoryInvoiceStore;

    const SECRET: &str = "middleware-secret";

    fn app() -> Router {
        let state = AppState::new(AppConfig::for_tests(SECRET), MemoryInvoiceStore::new()).unwrap();
        Router::new()
            .route(
                "/",
                get(|Extension(claims): Extension<VerifiedClaims>| async move {
                    claims.0.allows(Permission::GetInvoice.as_str()).to_string()
                }),
            )
            .layer(axum::middleware::from_fn_with_state(state, jwt_auth_middleware))
    }

    async fn call(authorization: Option<&str>) -> (StatusCode, String) {
        let mut builder = Request::builder().uri("/");
        if let Some(value) = authorization {
            builder = builder.header(AUTHORIZATION, value);
        }
        let response = app().oneshot(builder.body(Body::empty()).unwrap()).await.unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), 1024).await.unwrap();
        (status, String::from_utf8(body.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn rejects_missing_header() {
        assert_eq!(
            call(None).await,
            (StatusCode::UNAUTHORIZED, "Missing Authorization header\n".to_string())
        );
    }

    #[tokio::test]
    async fn rejects_garbage_token() {
        assert_eq!(
            call(Some("Bearer nope")).await,
            (StatusCode::UNAUTHORIZED, "Invalid JWT token\n".to_string())
        );
    }

    #[tokio::test]
    async fn attaches_claims_for_valid_token() {
        let token = generate_jwt(SECRET, &ClaimSet::new().grant(Permission::GetInvoice), Duration::hours(1)).unwrap();
        assert_eq!(
            call(Some(&format!("bearer {}", token))).await,
            (StatusCode::OK, "true".to_string())
        );
    }
}
