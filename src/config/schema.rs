//! Server configuration values.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::env::{Environment, APP_NAME_KEY, PORT_KEY};

/// Port used when the environment provides none.
pub const DEFAULT_PORT: u16 = 8080;

/// Identity of one service instance: a unique id, a logical name, and the
/// port it binds to.
///
/// Built via consuming `with_*` setters; each returns the modified value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    id: String,
    name: String,
    port: u16,
}

impl ServerConfig {
    /// Create a config with a freshly generated id and the default port.
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: String::new(),
            port: DEFAULT_PORT,
        }
    }

    /// Derive a config from a resolved environment: name from `APP_NAME`,
    /// port parsed from `PORT` (default port on absence or parse failure).
    pub fn from_env(env: &Environment) -> Self {
        let port = env.value(PORT_KEY).parse().unwrap_or(DEFAULT_PORT);
        Self::new().with_name(env.value(APP_NAME_KEY)).with_port(port)
    }

    /// Replace the instance id.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    /// Replace the logical service name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Replace the port.
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Instance id.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Logical service name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Configured port.
    pub fn port(&self) -> u16 {
        self.port
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ServerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ID: {}, Name: {}, Port: {}", self.id, self.name, self.port)
    }
}

/// Fixed transport-level bounds applied to every connection.
///
/// These bound a single connection's lifecycle, not application-level
/// operation cancellation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServerTimeouts {
    /// Maximum time to read a request (body included).
    pub read: Duration,
    /// Maximum time to produce and write a response.
    pub write: Duration,
    /// Keep-alive idle bound between requests.
    pub idle: Duration,
    /// Maximum time to read one request's headers.
    pub read_header: Duration,
    /// Maximum accepted header block size in bytes.
    pub max_header_bytes: usize,
}

impl Default for ServerTimeouts {
    fn default() -> Self {
        Self {
            read: Duration::from_secs(10),
            write: Duration::from_secs(10),
            idle: Duration::from_secs(120),
            read_header: Duration::from_secs(5),
            max_header_bytes: 1 << 20,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_chain() {
        let config = ServerConfig::new()
            .with_id("abc")
            .with_name("svc")
            .with_port(9090);

        assert_eq!(config.id(), "abc");
        assert_eq!(config.name(), "svc");
        assert_eq!(config.port(), 9090);
    }

    #[test]
    fn test_defaults() {
        let config = ServerConfig::new();

        assert_eq!(config.port(), DEFAULT_PORT);
        assert_eq!(config.name(), "");
        assert!(!config.id().is_empty());
    }

    #[test]
    fn test_default_ids_are_unique() {
        let a = ServerConfig::new();
        let b = ServerConfig::new();

        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn test_from_env() {
        let env: Environment = [
            ("APP_NAME".to_string(), "svc".to_string()),
            ("PORT".to_string(), "9090".to_string()),
        ]
        .into_iter()
        .collect();

        let config = ServerConfig::from_env(&env);

        assert_eq!(config.name(), "svc");
        assert_eq!(config.port(), 9090);
    }

    #[test]
    fn test_from_env_bad_port_falls_back() {
        let env: Environment = [("PORT".to_string(), "not-a-port".to_string())]
            .into_iter()
            .collect();

        assert_eq!(ServerConfig::from_env(&env).port(), DEFAULT_PORT);
    }

    #[test]
    fn test_display_format() {
        let config = ServerConfig::new().with_id("x").with_name("y").with_port(1);
        assert_eq!(config.to_string(), "ID: x, Name: y, Port: 1");
    }
}
