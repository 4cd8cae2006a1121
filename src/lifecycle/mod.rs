//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Server::start()
//!     → ShutdownHandle created, receiver moved into the accept task
//!
//! Server::kill()
//!     → ShutdownHandle::trigger → accept loop exits → listener dropped
//! ```
//!
//! # Design Decisions
//! - One handle per listener; the socket itself lives in the detached task
//! - Shutdown is abrupt: in-flight requests are not drained

pub mod shutdown;

pub use shutdown::ShutdownHandle;
