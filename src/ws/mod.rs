//! WebSocket layer: upgrade handling and the per-connection read/write loop.
//!
//! Clients connect at `/ws/{nickname}` (or the legacy
//! `/websocket/{nickname}/{uid}`) and exchange JSON payloads for direct or
//! broadcast delivery.

pub mod connection;
pub mod handler;
