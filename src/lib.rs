//! Bootstrap library for stand-alone HTTP services.
//!
//! # Architecture Overview
//!
//! ```text
//! env/.env ──┐
//!            ├─▶ env (layered resolution, override-wins merge)
//! env/{x}.env┘        │
//!                     ├─▶ publish to process environment
//!                     ▼
//!              config (ServerConfig, ServerTimeouts)
//!                     │
//!                     ▼
//!              http::Server ──▶ accept loop (detached task)
//!                     │                │
//!                     └─ kill() ──▶ lifecycle::ShutdownHandle
//! ```
//!
//! The crate owns exactly two concerns: resolving layered `.env`
//! configuration into one merged, process-visible mapping, and wiring an
//! HTTP listener with fixed transport timeouts around a caller-supplied
//! [`axum::Router`]. Route handlers, auth middleware, and CLI entry points
//! belong to the caller.

// Core subsystems
pub mod config;
pub mod env;
pub mod http;

// Cross-cutting concerns
pub mod lifecycle;
pub mod observability;

pub use config::{ServerConfig, ServerTimeouts};
pub use env::Environment;
pub use http::Server;
pub use lifecycle::ShutdownHandle;
