use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use serde::Serialize;

use super::headers::JSON_CONTENT_TYPE;
use crate::config::FailurePolicy;
use crate::error::ApiError;

/// Successful JSON body, written with four-space indentation and a trailing newline
#[derive(Debug)]
pub struct ApiResponse<T: Serialize> {
    pub data: T,
    pub status_code: StatusCode,
}

impl<T: Serialize> ApiResponse<T> {
    /// Create a successful API response with default 200 status
    pub fn ok(data: T) -> Self {
        Self::with_status(data, StatusCode::OK)
    }

    /// Create a 201 Created response
    pub fn created(data: T) -> Self {
        Self::with_status(data, StatusCode::CREATED)
    }

    pub fn with_status(data: T, status_code: StatusCode) -> Self {
        Self { data, status_code }
    }

    /// Serialize the body; a failure here is a contract violation handled per `policy`.
    pub fn render(self, policy: FailurePolicy) -> Response {
        match to_indented_json(&self.data) {
            Ok(body) => (self.status_code, [(header::CONTENT_TYPE, JSON_CONTENT_TYPE)], body).into_response(),
            Err(e) => contract_violation(policy, &format!("failed to serialize response data: {}", e)).into_response(),
        }
    }
}

pub fn to_indented_json<T: Serialize + ?Sized>(data: &T) -> Result<Vec<u8>, serde_json::Error> {
    let mut buf = Vec::with_capacity(256);
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    data.serialize(&mut serializer)?;
    buf.push(b'\n');
    Ok(buf)
}

/// Something only a bug can cause. Either takes the process down or turns into a 500.
pub fn contract_violation(policy: FailurePolicy, what: &str) -> ApiError {
    tracing::error!("contract violation: {}", what);
    match policy {
        FailurePolicy::Abort => std::process::abort(),
        FailurePolicy::Respond => ApiError::InternalServerError,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::ser::Error as _;
    use serde_json::json;

    struct Unserializable;

    impl Serialize for Unserializable {
        fn serialize<S: serde::Serializer>(&self, _serializer: S) -> Result<S::Ok, S::Error> {
            Err(S::Error::custom("refusing to serialize"))
        }
    }

    #[test]
    fn indents_with_four_spaces_and_newline() {
        let body = to_indented_json(&json!({ "id": 1 })).unwrap();
        assert_eq!(String::from_utf8(body).unwrap(), "{\n    \"id\": 1\n}\n");
    }

    #[test]
    fn empty_list_is_an_array() {
        let body = to_indented_json::<[u8]>(&[]).unwrap();
        assert_eq!(String::from_utf8(body).unwrap(), "[]\n");
    }

    #[test]
    fn render_sets_status_and_content_type() {
        let response = ApiResponse::created(json!({ "id": 1 })).render(FailurePolicy::Respond);
        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(response.headers()[header::CONTENT_TYPE], JSON_CONTENT_TYPE);
    }

    #[test]
    fn serialization_failure_responds_500_under_respond_policy() {
        let response = ApiResponse::ok(Unserializable).render(FailurePolicy::Respond);
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
