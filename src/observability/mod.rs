//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All modules emit tracing events
//!     → logging.rs (subscriber: fmt layer + env filter)
//!     → stdout
//! ```
//!
//! # Design Decisions
//! - Log level configurable via RUST_LOG, crate-scoped default otherwise
//! - Metrics and distributed tracing are the caller's concern

pub mod logging;

pub use logging::init;
