use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};

use crate::routes::{allowed_methods, INVOICES_PATH, INVOICE_PATH};

/// OPTIONS /invoices
pub async fn invoices_options() -> Response {
    preflight(INVOICES_PATH)
}

/// OPTIONS /invoices/:id
pub async fn invoice_options() -> Response {
    preflight(INVOICE_PATH)
}

fn preflight(path: &str) -> Response {
    let methods = allowed_methods(path);
    match HeaderValue::from_str(&methods) {
        Ok(value) => (StatusCode::NO_CONTENT, [(header::ACCESS_CONTROL_ALLOW_METHODS, value)]).into_response(),
        Err(_) => StatusCode::NO_CONTENT.into_response(),
    }
}
