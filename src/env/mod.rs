//! Environment resolution subsystem.
//!
//! # Data Flow
//! ```text
//! env/.env (mandatory defaults)
//!     → resolver.rs (parse via dotenvy)
//! CURRENT_ENV (process env, default-file fallback)
//!     → env/{name}.env (optional overrides)
//!     → environment.rs merge (override wins, pure)
//!     → publish_to_process (std::env::set_var per key)
//!     → Environment (merged, handed to the Server)
//! ```
//!
//! # Design Decisions
//! - The in-memory mapping is the source of truth; the process environment
//!   is a one-way export for global-lookup call sites
//! - Missing default file or current-environment name aborts the process
//! - Missing override file is logged and tolerated

pub mod environment;
pub mod resolver;

pub use environment::Environment;
pub use resolver::{APP_NAME_KEY, CURRENT_ENV_KEY, PORT_KEY};
pub use resolver::{DEFAULT_ENV_DIR, DEFAULT_ENV_FILE};
