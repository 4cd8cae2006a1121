//! The key/value environment mapping.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// A mapping of environment variable names to values.
///
/// Lookup order is irrelevant; precedence is decided at [`merge`] time.
/// The mapping is not synchronized; callers mutating it concurrently with
/// resolution must hold their own lock.
///
/// [`merge`]: Environment::merge
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Environment(HashMap<String, String>);

impl Environment {
    /// Create an empty environment.
    pub fn new() -> Self {
        Self(HashMap::new())
    }

    /// Value for `key`, or the empty string when absent.
    ///
    /// Callers cannot distinguish a missing key from an empty value.
    pub fn value(&self, key: &str) -> String {
        self.0.get(key).cloned().unwrap_or_default()
    }

    /// Set `key` to `value`, inserting or replacing.
    pub fn update(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    /// Combine two environments, `overrides` winning on key collision.
    ///
    /// Pure: neither input is mutated, repeated calls yield equal results.
    pub fn merge(&self, overrides: &Environment) -> Environment {
        let mut merged = self.0.clone();
        for (key, value) in &overrides.0 {
            merged.insert(key.clone(), value.clone());
        }
        Environment(merged)
    }

    /// Iterate over all key/value pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &String)> {
        self.0.iter()
    }

    /// Number of keys in the mapping.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the mapping holds no keys.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<HashMap<String, String>> for Environment {
    fn from(map: HashMap<String, String>) -> Self {
        Self(map)
    }
}

impl FromIterator<(String, String)> for Environment {
    fn from_iter<T: IntoIterator<Item = (String, String)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}
