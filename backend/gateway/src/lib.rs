//! tutorbridge HTTP gateway.
//!
//! Serves the voice-platform webhook plus small health and config endpoints.

pub mod health_api;
pub mod server;
pub mod webhook;

pub use server::{build_router, start_server, GatewayState};
