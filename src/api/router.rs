//! HTTP router
//!
//! Route table for the user and health endpoints, plus the CORS and tracing layers.

use axum::{
    http::{header, HeaderValue, Method},
    middleware,
    routing::get,
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use super::health;
use super::middleware::logging_middleware;
use super::state::AppState;
use super::users;
use crate::domain::DomainError;

/// CORS policy for the browser client
///
/// A single explicit origin is allowed, with credentials.
pub fn cors_layer(allowed_origin: &str) -> Result<CorsLayer, DomainError> {
    let origin = HeaderValue::from_str(allowed_origin).map_err(|e| {
        DomainError::configuration(format!("Invalid CORS origin '{}': {}", allowed_origin, e))
    })?;

    Ok(CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([
            Method::GET,
            Method::HEAD,
            Method::PUT,
            Method::PATCH,
            Method::POST,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT, header::AUTHORIZATION])
        .allow_credentials(true))
}

/// Create the full router with application state
pub fn create_router(state: AppState, allowed_origin: &str) -> Result<Router, DomainError> {
    let router = Router::new()
        .route("/", get(health::root))
        .route("/health", get(health::health_check))
        .route("/ready", get(health::ready_check))
        .route("/users", get(users::list_users).post(users::create_user))
        .route(
            "/users/{id}",
            get(users::get_user)
                .patch(users::update_user)
                .delete(users::delete_user),
        )
        .with_state(state)
        .layer(middleware::from_fn(logging_middleware))
        .layer(cors_layer(allowed_origin)?)
        .layer(TraceLayer::new_for_http());

    Ok(router)
}
