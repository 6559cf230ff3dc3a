use axum::{
    http::Method,
    middleware::{from_fn, from_fn_with_state},
    routing::get,
    Router,
};
use tower::ServiceBuilder;

use crate::auth::Permission;
use crate::handlers::{invoices, route_not_found};
use crate::middleware::{
    allow_any_origin, correlation_id_middleware, default_json_content_type, jwt_auth_middleware,
    permission_middleware, request_trace_layer,
};
use crate::state::AppState;

pub const INVOICES_PATH: &str = "/invoices";
pub const INVOICE_PATH: &str = "/invoices/:id";

/// One bound verb+path and the claim it requires, if any.
#[derive(Debug, Clone, Copy)]
pub struct RouteRule {
    pub method: &'static str,
    pub path: &'static str,
    pub permission: Option<Permission>,
}

/// The whole authorization surface of the service.
pub static ROUTE_PERMISSIONS: &[RouteRule] = &[
    RouteRule { method: "GET", path: INVOICES_PATH, permission: Some(Permission::GetInvoices) },
    RouteRule { method: "POST", path: INVOICES_PATH, permission: Some(Permission::CreateInvoice) },
    RouteRule { method: "OPTIONS", path: INVOICES_PATH, permission: None },
    RouteRule { method: "GET", path: INVOICE_PATH, permission: Some(Permission::GetInvoice) },
    RouteRule { method: "OPTIONS", path: INVOICE_PATH, permission: None },
];

/// Claim required for `method` on the matched route pattern. HEAD is held to the GET rule.
pub fn required_permission(method: &Method, path: &str) -> Option<Permission> {
    let method = if *method == Method::HEAD { Method::GET.as_str() } else { method.as_str() };
    ROUTE_PERMISSIONS
        .iter()
        .find(|rule| rule.path == path && rule.method == method)
        .and_then(|rule| rule.permission)
}

/// Comma-separated verbs bound to `path`, in table order.
pub fn allowed_methods(path: &str) -> String {
    ROUTE_PERMISSIONS
        .iter()
        .filter(|rule| rule.path == path)
        .map(|rule| rule.method)
        .collect::<Vec<_>>()
        .join(",")
}

/// Full application: routes, permission gate, and the request pipeline
/// (outermost first) correlation id → request log → response headers → JWT auth.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route(
            INVOICES_PATH,
            get(invoices::list_invoices)
                .post(invoices::create_invoice)
                .options(invoices::invoices_options)
                .fallback(route_not_found),
        )
        .route(
            INVOICE_PATH,
            get(invoices::get_invoice)
                .options(invoices::invoice_options)
                .fallback(route_not_found),
        )
        .route_layer(from_fn_with_state(state.clone(), permission_middleware))
        .fallback(route_not_found)
        .layer(
            ServiceBuilder::new()
                .layer(from_fn(correlation_id_middleware))
                .layer(request_trace_layer())
                .layer(allow_any_origin())
                .layer(default_json_content_type())
                .layer(from_fn_with_state(state.clone(), jwt_auth_middleware)),
        )
        .with_state(state)
}
