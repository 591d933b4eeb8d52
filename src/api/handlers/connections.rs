//! Live connection listing.

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};

use crate::app_state::AppState;
use crate::domain::{ConnectionId, ConnectionSummary};
use crate::error::{ErrorResponse, RelayError};

/// `GET /connections` — List all live connections.
#[utoipa::path(
    get,
    path = "/api/v1/connections",
    tag = "Connections",
    summary = "List live connections",
    description = "Returns every registered connection in registry snapshot order.",
    responses(
        (status = 200, description = "Live connections", body = Vec<ConnectionSummary>),
    )
)]
pub async fn list_connections(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.relay.registry().summaries().await)
}

/// `GET /connections/{id}` — Get one live connection.
///
/// # Errors
///
/// Returns [`RelayError::NotFound`] if no connection is registered under `id`.
#[utoipa::path(
    get,
    path = "/api/v1/connections/{id}",
    tag = "Connections",
    summary = "Get a live connection",
    params(
        ("id" = String, Path, description = "Connection id"),
    ),
    responses(
        (status = 200, description = "Connection found", body = ConnectionSummary),
        (status = 404, description = "No live connection with this id", body = ErrorResponse),
    )
)]
pub async fn get_connection(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ConnectionSummary>, RelayError> {
    let handle = state.relay.registry().get(&ConnectionId::from(id)).await?;
    Ok(Json(ConnectionSummary::from(&handle)))
}

/// Connection routes, nested under `/api/v1`.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/connections", get(list_connections))
        .route("/connections/{id}", get(get_connection))
}
