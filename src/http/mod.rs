//! HTTP listener subsystem.
//!
//! # Data Flow
//! ```text
//! Server::new(env, handler)
//!     → wrap handler with trace + timeout layers
//! Server::start()
//!     → spawn accept loop (detached task)
//!         → bind 0.0.0.0:{PORT} → log banner → accept connections
//!         → per connection: hyper auto builder (h1/h2), fixed timeouts
//! Server::kill()
//!     → trigger shutdown handle → loop exits → port released
//! ```
//!
//! # Design Decisions
//! - start() never blocks and never fails; bind failure is fatal inside the
//!   accept task
//! - kill() on an unstarted or closed server panics, double-close is a
//!   caller bug to surface loudly

pub mod server;

pub use server::Server;
