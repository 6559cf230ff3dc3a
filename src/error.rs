// HTTP API Error Types
use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};

use crate::auth::AuthError;
use crate::database::DatabaseError;

const PLAIN_TEXT: &str = "text/plain; charset=utf-8";

/// Every way a request can fail, mapped onto a status code and a client-safe body
#[derive(Debug)]
pub enum ApiError {
    // 401 Unauthorized
    MissingAuthorization,
    InvalidToken,
    ExpiredToken,

    // 403 Forbidden
    PermissionDenied,

    // 404 Not Found
    NotFound(String),
    RouteNotFound(String),

    // 422 Unprocessable Entity
    UnprocessableEntity(String),
    InvalidBody(Value),

    // 500 Internal Server Error
    InternalServerError,

    // 504 Gateway Timeout
    Timeout,
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::MissingAuthorization | ApiError::InvalidToken | ApiError::ExpiredToken => {
                StatusCode::UNAUTHORIZED
            }
            ApiError::PermissionDenied => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) | ApiError::RouteNotFound(_) => StatusCode::NOT_FOUND,
            ApiError::UnprocessableEntity(_) | ApiError::InvalidBody(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::InternalServerError => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Timeout => StatusCode::GATEWAY_TIMEOUT,
        }
    }

    /// Get client-safe error message
    pub fn message(&self) -> &str {
        match self {
            ApiError::MissingAuthorization => "Missing Authorization header",
            ApiError::InvalidToken => "Invalid JWT token",
            ApiError::ExpiredToken => "Invalid or expired JWT token",
            ApiError::PermissionDenied => "Operation not permitted",
            ApiError::NotFound(msg) => msg,
            ApiError::RouteNotFound(msg) => msg,
            ApiError::UnprocessableEntity(msg) => msg,
            ApiError::InvalidBody(_) => "Unprocessable request body",
            ApiError::InternalServerError => "Internal server error",
            ApiError::Timeout => "Request timed out",
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(message.into())
    }

    pub fn unprocessable_entity(message: impl Into<String>) -> Self {
        ApiError::UnprocessableEntity(message.into())
    }

    /// 422 whose body describes where JSON decoding stopped
    pub fn invalid_json(err: &serde_json::Error) -> Self {
        ApiError::InvalidBody(json!({
            "error": err.to_string(),
            "category": format!("{:?}", err.classify()).to_lowercase(),
            "line": err.line(),
            "column": err.column(),
        }))
    }

    pub fn route_not_found(method: &str, uri: &str) -> Self {
        ApiError::RouteNotFound(format!("{} {}", method, uri))
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::MissingHeader => ApiError::MissingAuthorization,
            AuthError::InvalidToken(reason) => {
                tracing::info!("rejected token: {}", reason);
                ApiError::InvalidToken
            }
            AuthError::Expired(reason) => {
                tracing::info!("rejected token: {}", reason);
                ApiError::ExpiredToken
            }
        }
    }
}

impl From<DatabaseError> for ApiError {
    fn from(err: DatabaseError) -> Self {
        match err {
            DatabaseError::NotFound(_) => ApiError::not_found(err.to_string()),
            other => {
                // Log the real error but return generic message
                tracing::error!("storage error: {}", other);
                ApiError::InternalServerError
            }
        }
    }
}

// Standard error trait implementations
impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for ApiError {}

// Plain-text errors end with a newline, JSON errors carry their own content type
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        match self {
            ApiError::InvalidBody(body) => (status, Json(body)).into_response(),
            other => {
                let mut response = (status, format!("{}\n", other.message())).into_response();
                let headers = response.headers_mut();
                headers.insert(header::CONTENT_TYPE, HeaderValue::from_static(PLAIN_TEXT));
                headers.insert(header::X_CONTENT_TYPE_OPTIONS, HeaderValue::from_static("nosniff"));
                response
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_taxonomy_to_status() {
        assert_eq!(ApiError::MissingAuthorization.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::ExpiredToken.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::PermissionDenied.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(ApiError::Timeout.status_code(), StatusCode::GATEWAY_TIMEOUT);
        assert_eq!(ApiError::route_not_found("GET", "/x").status_code(), StatusCode::NOT_FOUND);
        assert_eq!(ApiError::unprocessable_entity("bad").status_code(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn storage_details_are_not_exposed() {
        let err: ApiError = DatabaseError::Unavailable("connection refused on 10.0.0.3".to_string()).into();
        assert_eq!(err.message(), "Internal server error");
    }

    #[test]
    fn not_found_keeps_store_message() {
        let err: ApiError = DatabaseError::NotFound(7).into();
        assert_eq!(err.message(), "Invoice with ID=7 not found");
    }

    #[test]
    fn invalid_json_reports_position() {
        let parse_err = serde_json::from_str::<Value>("not json").unwrap_err();
        match ApiError::invalid_json(&parse_err) {
            ApiError::InvalidBody(body) => {
                assert_eq!(body["category"], "syntax");
                assert_eq!(body["line"], 1);
            }
            other => panic!("unexpected {:?}", other),
        }
    }
}
