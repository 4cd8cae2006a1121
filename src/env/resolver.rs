//! Layered resolution of `.env` configuration files.
//!
//! # Responsibilities
//! - Read the mandatory default file (`env/.env`)
//! - Determine the current environment name
//! - Read the optional environment-specific override file
//! - Merge (override wins) and publish the result to the process environment
//!
//! # Design Decisions
//! - Fail fast: bootstrap invariants abort the process, they are never
//!   returned as recoverable errors
//! - The override file is read only after the current environment name is
//!   known; the sequencing is fixed

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::env::Environment;

/// Key holding the logical service name.
pub const APP_NAME_KEY: &str = "APP_NAME";
/// Key naming the current environment, which selects the override file.
pub const CURRENT_ENV_KEY: &str = "CURRENT_ENV";
/// Key holding the TCP port the listener binds to.
pub const PORT_KEY: &str = "PORT";

/// Directory holding the env files.
pub const DEFAULT_ENV_DIR: &str = "env";
/// File name of the mandatory default file inside [`DEFAULT_ENV_DIR`].
pub const DEFAULT_ENV_FILE: &str = ".env";

/// Diagnostics for bootstrap failures. These are rendered into the abort
/// message, never returned across the public surface.
#[derive(Debug, Error)]
pub enum EnvError {
    /// The mandatory default file could not be read.
    #[error("default env file {path} is missing or unreadable: {source}")]
    DefaultFile {
        path: PathBuf,
        source: dotenvy::Error,
    },

    /// An env file exists but one of its entries failed to parse.
    #[error("malformed entry in env file {path}: {source}")]
    Malformed {
        path: PathBuf,
        source: dotenvy::Error,
    },

    /// No current environment name anywhere.
    #[error("no CURRENT_ENV variable found in the process environment or the default file")]
    NoCurrentEnv,
}

impl Environment {
    /// Resolve the layered environment from the `env/` directory, publish it
    /// to the process environment, and return the merged mapping.
    ///
    /// # Panics
    ///
    /// Aborts on any bootstrap-fatal condition: missing default file,
    /// unknown current environment name, or a malformed env file.
    pub fn resolve() -> Environment {
        resolve_from(Path::new(DEFAULT_ENV_DIR))
    }
}

/// Resolve the layered environment against an explicit base directory.
///
/// Sequencing is fixed: default file, current environment name, override
/// file, merge, publish.
pub fn resolve_from(dir: &Path) -> Environment {
    let defaults = read_default_file(dir);
    let current = current_env_name(&defaults);
    let overrides = read_override_file(dir, &current);

    let merged = defaults.merge(&overrides);
    publish_to_process(&merged);

    merged
}

/// Write every pair of the mapping into the ambient process environment.
///
/// One-way export for global-lookup call sites; reads inside this crate go
/// through the explicit mapping.
pub fn publish_to_process(env: &Environment) {
    for (key, value) in env.iter() {
        std::env::set_var(key, value);
    }
}

/// Read the mandatory default file. Aborts when it cannot be read.
fn read_default_file(dir: &Path) -> Environment {
    let path = dir.join(DEFAULT_ENV_FILE);

    match read_env_file(&path) {
        Ok(env) => env,
        Err(source) => {
            let err = EnvError::DefaultFile { path, source };
            tracing::error!(error = %err, "failed to read default env file");
            panic!("{err}");
        }
    }
}

/// Determine the current environment name.
///
/// The process variable wins; a `CURRENT_ENV` entry in the default file is
/// honored as a fallback since defaults are published anyway.
fn current_env_name(defaults: &Environment) -> String {
    if let Ok(name) = std::env::var(CURRENT_ENV_KEY) {
        if !name.is_empty() {
            return name;
        }
    }

    let name = defaults.value(CURRENT_ENV_KEY);
    if name.is_empty() {
        let err = EnvError::NoCurrentEnv;
        tracing::error!(error = %err, "cannot select an override env file");
        panic!("{err}");
    }

    name
}

/// Read the environment-specific override file.
///
/// Absence is tolerated: overrides are optional and resolution proceeds with
/// defaults only. A file that exists but fails to parse is fatal.
fn read_override_file(dir: &Path, name: &str) -> Environment {
    let path = dir.join(format!("{name}.env"));

    match read_env_file(&path) {
        Ok(env) => {
            tracing::debug!(path = %path.display(), keys = env.len(), "loaded override env file");
            env
        }
        Err(err) if err.not_found() => {
            tracing::info!(path = %path.display(), "no override env file, proceeding with defaults");
            Environment::new()
        }
        Err(source) => {
            let err = EnvError::Malformed { path, source };
            tracing::error!(error = %err, "failed to read override env file");
            panic!("{err}");
        }
    }
}

/// Parse one `.env` file into a mapping without touching the process
/// environment.
fn read_env_file(path: &Path) -> Result<Environment, dotenvy::Error> {
    let mut env = Environment::new();
    for item in dotenvy::from_path_iter(path)? {
        let (key, value) = item?;
        env.update(key, value);
    }
    Ok(env)
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::sync::Mutex;

    use super::*;

    // The process environment is global; every test touching it serializes
    // behind this lock.
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    fn lock() -> std::sync::MutexGuard<'static, ()> {
        ENV_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write_env_dir(files: &[(&str, &str)]) -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        for (name, contents) in files {
            fs::write(dir.path().join(name), contents).unwrap();
        }
        dir
    }

    #[test]
    fn test_override_wins_default_preserved() {
        let _guard = lock();
        std::env::remove_var(CURRENT_ENV_KEY);

        let dir = write_env_dir(&[
            (".env", "PORT=8080\nAPP_NAME=svc\nCURRENT_ENV=test\n"),
            ("test.env", "PORT=9090\n"),
        ]);

        let env = resolve_from(dir.path());

        assert_eq!(env.value(PORT_KEY), "9090");
        assert_eq!(env.value(APP_NAME_KEY), "svc");
        assert_eq!(std::env::var(PORT_KEY).unwrap(), "9090");
        assert_eq!(std::env::var(APP_NAME_KEY).unwrap(), "svc");
    }

    #[test]
    fn test_process_var_selects_override_file() {
        let _guard = lock();
        std::env::set_var(CURRENT_ENV_KEY, "staging");

        let dir = write_env_dir(&[
            (".env", "PORT=8080\n"),
            ("staging.env", "PORT=7070\n"),
        ]);

        let env = resolve_from(dir.path());
        assert_eq!(env.value(PORT_KEY), "7070");

        std::env::remove_var(CURRENT_ENV_KEY);
    }

    #[test]
    fn test_missing_override_file_is_soft() {
        let _guard = lock();
        std::env::remove_var(CURRENT_ENV_KEY);

        let dir = write_env_dir(&[(".env", "PORT=8080\nAPP_NAME=svc\nCURRENT_ENV=nosuch\n")]);

        let env = resolve_from(dir.path());

        assert_eq!(env.value(PORT_KEY), "8080");
        assert_eq!(env.value(APP_NAME_KEY), "svc");
    }

    #[test]
    #[should_panic(expected = "default env file")]
    fn test_missing_default_file_is_fatal() {
        let _guard = lock();

        let dir = tempfile::tempdir().unwrap();
        resolve_from(dir.path());
    }

    #[test]
    #[should_panic(expected = "malformed entry")]
    fn test_malformed_override_file_is_fatal() {
        let _guard = lock();
        std::env::remove_var(CURRENT_ENV_KEY);

        // Override file exists but is not key=value syntax; unlike absence,
        // this must abort.
        let dir = write_env_dir(&[
            (".env", "PORT=8080\nCURRENT_ENV=test\n"),
            ("test.env", "THIS IS NOT VALID\n====\n"),
        ]);

        resolve_from(dir.path());
    }

    #[test]
    #[should_panic(expected = "no CURRENT_ENV variable")]
    fn test_missing_current_env_is_fatal() {
        let _guard = lock();
        std::env::remove_var(CURRENT_ENV_KEY);

        let dir = write_env_dir(&[(".env", "PORT=8080\n")]);
        resolve_from(dir.path());
    }
}
