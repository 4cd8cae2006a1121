//! Shared fixtures for integration tests.

use std::fs;

use tempfile::TempDir;

/// Materialize a directory of env files: `(file name, contents)` pairs.
#[allow(dead_code)]
pub fn env_dir(files: &[(&str, &str)]) -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    for (name, contents) in files {
        fs::write(dir.path().join(name), contents).unwrap();
    }
    dir
}
