//! Service layer: message routing and the connection lifecycle entry points.

pub mod relay_service;
pub mod router;

pub use relay_service::RelayService;
pub use router::{DeliveryReport, MessageRouter, RouteOutcome};
