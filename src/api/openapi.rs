//! OpenAPI document for the REST surface.

use utoipa::OpenApi;

use super::handlers::{connections, system};

/// Generated OpenAPI description of the operator endpoints.
#[derive(Debug, OpenApi)]
#[openapi(
    info(title = "relay-gateway", description = "Operator API of the WebSocket message relay"),
    paths(
        system::health_handler,
        connections::list_connections,
        connections::get_connection,
    ),
    tags(
        (name = "System", description = "Service health"),
        (name = "Connections", description = "Live connection registry"),
    )
)]
pub struct ApiDoc;
