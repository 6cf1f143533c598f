//! Telemetry and structured logging components for tutorbridge.
//!
//! Handles log redaction, console/JSON output, file rotation, and per-turn
//! dialog event logging.

pub mod event_logger;
pub mod logger;
pub mod redact;

pub use event_logger::{EventLogger, TurnEvent, TurnLogEntry};
pub use logger::{init_logger, LogOptions};
pub use redact::redact_sensitive_data;
