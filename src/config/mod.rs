//! Configuration subsystem.
//!
//! # Data Flow
//! ```text
//! Environment (merged mapping)
//!     → schema.rs (ServerConfig::from_env: name, port, fresh id)
//!     → owned by http::Server, immutable afterwards
//!
//! ServerTimeouts (fixed transport bounds)
//!     → applied by the Server when wiring the listener
//! ```
//!
//! # Design Decisions
//! - ServerConfig is a value object built via consuming `with_*` setters
//! - Defaults are usable as-is: fresh uuid id, port 8080
//! - No validation beyond key presence; the mapping is the source of truth

pub mod schema;

pub use schema::ServerConfig;
pub use schema::ServerTimeouts;
pub use schema::DEFAULT_PORT;
