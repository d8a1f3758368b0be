//! Router assembly.

use std::sync::Arc;

use axum::{
    Router,
    http::{
        HeaderValue, Method, StatusCode,
        header::{AUTHORIZATION, CONTENT_TYPE},
    },
    routing::{delete, get, post},
};
use tower_http::{cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer};

use crate::{config::Config, handlers, store::ApiKeyStore};

/// State shared with every handler via `State` extraction.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ApiKeyStore>,
}

impl AppState {
    pub fn new(store: Arc<dyn ApiKeyStore>) -> Self {
        Self { store }
    }
}

/// Build the HTTP router with CORS, request timeout and tracing layers.
pub fn router(state: AppState, config: &Config) -> Router {
    Router::new()
        .route("/health", get(handlers::health::health_check))
        .route(
            "/keys",
            post(handlers::keys::generate_key).get(handlers::keys::list_keys),
        )
        .route("/keys/validate", post(handlers::keys::validate_key))
        .route("/keys/{key_id}", delete(handlers::keys::revoke_key))
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            config.request_timeout(),
        ))
        .layer(cors_layer(config))
        // Add distributed tracing middleware for observability
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors_layer(config: &Config) -> CorsLayer {
    // Credentials cannot be combined with a wildcard origin.
    let origins: Vec<HeaderValue> = config
        .cors_origins()
        .iter()
        .filter(|origin| origin.as_str() != "*")
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
        .allow_credentials(true)
}
