//! # relay-gateway
//!
//! Real-time WebSocket message relay. Clients connect under a display name,
//! receive a connection id, and exchange text messages either directly (one
//! recipient, echoed back to the sender) or as broadcasts to every live
//! connection.
//!
//! ## Architecture
//!
//! ```text
//! Clients (WebSocket, HTTP)
//!     │
//!     ├── WS Handler (ws/)
//!     ├── REST Handlers (api/)
//!     │
//!     ├── RelayService + MessageRouter (service/)
//!     │
//!     └── ConnectionRegistry (domain/)
//! ```

pub mod api;
pub mod app_state;
pub mod config;
pub mod domain;
pub mod error;
pub mod server;
pub mod service;
pub mod ws;
