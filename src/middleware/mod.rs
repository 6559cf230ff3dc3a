pub mod auth;
pub mod correlation;
pub mod headers;
pub mod logging;
pub mod permission;
pub mod response;

pub use auth::jwt_auth_middleware;
pub use correlation::{correlation_id_middleware, CorrelationId, CORRELATION_ID_HEADER};
pub use headers::{allow_any_origin, default_json_content_type, JSON_CONTENT_TYPE};
pub use logging::request_trace_layer;
pub use permission::permission_middleware;
pub use response::{contract_violation, ApiResponse};
