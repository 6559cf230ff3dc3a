use axum::{
    extract::Request,
    http::{HeaderName, HeaderValue},
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

pub static CORRELATION_ID_HEADER: HeaderName = HeaderName::from_static("x-correlation-id");

/// Correlation id of the current request, available to handlers as an extension
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CorrelationId(pub String);

impl CorrelationId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Fresh lowercase hyphenated v4 UUID.
fn generate_correlation_id() -> HeaderValue {
    let mut buf = Uuid::encode_buffer();
    let id = Uuid::new_v4().hyphenated().encode_lower(&mut buf);
    // 36 chars of hex digits and hyphens, always a legal header value
    HeaderValue::from_str(id).expect("uuid is a valid header value")
}

/// Outermost middleware: guarantees an `X-Correlation-ID` on the request and
/// echoes it on whatever response comes back, error responses included.
pub async fn correlation_id_middleware(mut request: Request, next: Next) -> Response {
    let supplied = request
        .headers()
        .get(&CORRELATION_ID_HEADER)
        .filter(|value| !value.as_bytes().iter().all(u8::is_ascii_whitespace))
        .cloned();

    let value = match supplied {
        Some(value) => value,
        None => {
            let generated = generate_correlation_id();
            request.headers_mut().insert(CORRELATION_ID_HEADER.clone(), generated.clone());
            generated
        }
    };

    request
        .extensions_mut()
        .insert(CorrelationId(String::from_utf8_lossy(value.as_bytes()).into_owned()));

    let mut response = next.run(request).await;
    response.headers_mut().insert(CORRELATION_ID_HEADER.clone(), value);
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::StatusCode, routing::get, Extension, Router};
    use tower::ServiceExt;

    fn app() -> Router {
        Router::new()
            .route("/", get(|Extension(id): Extension<CorrelationId>| async move { id.0 }))
            .layer(axum::middleware::from_fn(correlation_id_middleware))
    }

    #[tokio::test]
    async fn echoes_supplied_id() {
        let request = Request::builder()
            .uri("/")
            .header("X-Correlation-ID", "correlation-ID-bla-bla")
            .body(Body::empty())
            .unwrap();

        let response = app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()["x-correlation-id"], "correlation-ID-bla-bla");

        let body = axum::body::to_bytes(response.into_body(), 1024).await.unwrap();
        assert_eq!(&body[..], b"correlation-ID-bla-bla");
    }

    #[test]
    fn generated_ids_are_canonical_v4() {
        let value = generate_correlation_id();
        let id = value.to_str().unwrap();
        let parsed = Uuid::parse_str(id).unwrap();
        assert_eq!(parsed.get_version_num(), 4);
        assert_eq!(parsed.hyphenated().to_string(), id);
    }

    #[tokio::test]
    async fn generates_uuid_when_blank() {
        for supplied in [None, Some(""), Some("   ")] {
            let mut builder = Request::builder().uri("/");
            if let Some(value) = supplied {
                builder = builder.header("X-Correlation-ID", value);
            }

            let response = app().oneshot(builder.body(Body::empty()).unwrap()).await.unwrap();
            let id = response.headers()["x-correlation-id"].to_str().unwrap().to_string();
            let parsed = Uuid::parse_str(&id).unwrap();
            assert_eq!(parsed.hyphenated().to_string(), id);
        }
    }
}
