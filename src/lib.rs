//! Vietnamese lunar calendar engine and the yearly reminder scheduler built on
//! top of it, with a thin axum service in front.

use std::sync::Arc;

use axum::{routing::get, Router};
use http::HeaderValue;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub mod config;
pub mod db;
pub mod error;
pub mod i18n;
pub mod lunar;
pub mod routes;
pub mod services;

use config::Config;
use db::EventStore;
use services::RecurrenceResolver;

pub struct AppState {
    pub config: Config,
    pub store: Arc<dyn EventStore>,
    pub resolver: RecurrenceResolver,
}

impl AppState {
    pub fn new(config: Config, store: Arc<dyn EventStore>) -> Self {
        let resolver = RecurrenceResolver::new(config.recurrence.search_years);
        Self {
            config,
            store,
            resolver,
        }
    }
}

/// Build the service router.
pub fn app(state: Arc<AppState>) -> Router {
    let cors = match state.config.server.frontend_url.parse::<HeaderValue>() {
        Ok(origin) => CorsLayer::new().allow_origin(origin),
        Err(_) => {
            tracing::warn!(
                "Invalid FRONTEND_URL {:?}, CORS disabled",
                state.config.server.frontend_url
            );
            CorsLayer::new()
        }
    }
    .allow_methods([http::Method::GET, http::Method::POST, http::Method::OPTIONS])
    .allow_headers([http::header::CONTENT_TYPE, http::header::ACCEPT]);

    Router::new()
        .route("/health", get(routes::health::health_check))
        .nest("/api/lunar", routes::lunar::router())
        .nest("/api/recurrence", routes::recurrence::router())
        .nest("/api/notifications", routes::notifications::router())
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
