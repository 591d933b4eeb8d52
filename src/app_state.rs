//! Shared application state injected into all Axum handlers.

use std::sync::Arc;

use crate::config::RelayConfig;
use crate::service::RelayService;

/// Shared application state available to all handlers via Axum's
/// `State` extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Relay service for connection lifecycle and routing.
    pub relay: Arc<RelayService>,
    /// Runtime configuration (queue sizes, frame limits).
    pub config: Arc<RelayConfig>,
}
