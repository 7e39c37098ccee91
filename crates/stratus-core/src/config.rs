//! Program configuration
//!
//! Programs receive an explicit [`ProgramConfig`] at construction time
//! instead of reading ambient global settings. Each program enumerates the
//! keys it recognizes as [`ConfigKey`]s so tooling can list them.

use crate::error::{CoreError, Result};
use std::collections::BTreeMap;

/// A configuration key a program recognizes
#[derive(Debug, Clone, Copy)]
pub struct ConfigKey {
    pub name: &'static str,
    /// `None` means the key is required
    pub default: Option<&'static str>,
    pub description: &'static str,
}

impl ConfigKey {
    pub const fn optional(
        name: &'static str,
        default: &'static str,
        description: &'static str,
    ) -> Self {
        Self {
            name,
            default: Some(default),
            description,
        }
    }

    pub const fn required(name: &'static str, description: &'static str) -> Self {
        Self {
            name,
            default: None,
            description,
        }
    }

    pub const fn is_required(&self) -> bool {
        self.default.is_none()
    }
}

/// Key/value settings consumed at program declaration time
#[derive(Debug, Clone, Default)]
pub struct ProgramConfig {
    values: BTreeMap<String, String>,
}

impl ProgramConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Read a key, falling back to the given default
    pub fn get_or(&self, key: &str, default: &str) -> String {
        self.get(key).unwrap_or(default).to_string()
    }

    /// Read a key that has no default
    pub fn require(&self, key: &str) -> Result<String> {
        self.get(key)
            .map(str::to_string)
            .ok_or_else(|| CoreError::MissingConfig(key.to_string()))
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl FromIterator<(String, String)> for ProgramConfig {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}
