use axum::http::{header, HeaderValue};
use tower_http::set_header::SetResponseHeaderLayer;

pub const JSON_CONTENT_TYPE: &str = "application/json; charset=UTF-8";

/// `Access-Control-Allow-Origin: *` on every response.
pub fn allow_any_origin() -> SetResponseHeaderLayer<HeaderValue> {
    SetResponseHeaderLayer::overriding(header::ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"))
}

/// JSON content type unless the response already declared its own.
pub fn default_json_content_type() -> SetResponseHeaderLayer<HeaderValue> {
    SetResponseHeaderLayer::if_not_present(header::CONTENT_TYPE, HeaderValue::from_static(JSON_CONTENT_TYPE))
}
