//! API middleware.

mod auth;
mod security_headers;

pub use auth::auth_middleware;
pub use security_headers::{cors_layer, security_headers};
