//! HTTP router assembly shared by the binary and the integration tests.

use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::api;
use crate::app_state::AppState;
use crate::config::RelayConfig;
use crate::domain::ConnectionRegistry;
use crate::service::RelayService;
use crate::ws::handler::{legacy_ws_handler, ws_handler};

/// Builds the application state: one registry per process, injected into
/// the relay service.
#[must_use]
pub fn build_state(config: RelayConfig) -> AppState {
    let registry = Arc::new(ConnectionRegistry::new());
    AppState {
        relay: Arc::new(RelayService::new(registry)),
        config: Arc::new(config),
    }
}

/// Builds the full router: REST API, WebSocket endpoints, and (with the
/// `swagger-ui` feature) the interactive API docs.
pub fn build_app(state: AppState) -> Router {
    let router = Router::new()
        .merge(api::build_router())
        .route("/ws/{nickname}", get(ws_handler))
        .route("/websocket/{nickname}/{uid}", get(legacy_ws_handler));

    #[cfg(feature = "swagger-ui")]
    let router = {
        use utoipa::OpenApi;
        use utoipa_swagger_ui::SwaggerUi;

        router.merge(
            SwaggerUi::new("/swagger-ui")
                .url("/api-docs/openapi.json", api::openapi::ApiDoc::openapi()),
        )
    };

    router
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
