//! Flat, prefix-addressed settings
//!
//! The server keeps its configuration as dotted keys (`pypi.cache_time`).
//! Components pull out the keys under their prefix and deserialize them into
//! a typed section. Keys missing from the configuration stay missing, so
//! serde defaults apply instead of explicit nulls.

use crate::cache::{CacheError, TimedCache};
use crate::error::ErrorKind;
use crate::locator::{Compatibility, LocatorConfig, TagSet};
use crate::score::DEFAULT_TRUSTED_HOST;
use serde::de::{self, DeserializeOwned, Deserializer};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::Debug;
use std::hash::Hash;
use thiserror::Error;
use toml::Value;

/// Errors that can occur while reading settings
#[derive(Debug, Error)]
pub enum SettingsError {
    /// Failed to parse TOML, or a section did not match its type
    #[error("Failed to parse settings: {0}")]
    Parse(#[from] toml::de::Error),

    /// A value parsed but is not acceptable
    #[error("Invalid setting {key}: {message}")]
    Invalid { key: String, message: String },
}

impl SettingsError {
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::InvalidConfiguration
    }
}

/// Flat settings map keyed by dotted names
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Settings {
    values: BTreeMap<String, Value>,
}

fn flatten(prefix: &str, table: toml::Table, out: &mut BTreeMap<String, Value>) {
    for (key, value) in table {
        let key = if prefix.is_empty() {
            key
        } else {
            format!("{}.{}", prefix, key)
        };
        match value {
            Value::Table(inner) => flatten(&key, inner, out),
            other => {
                out.insert(key, other);
            }
        }
    }
}

impl Settings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a TOML document, flattening nested tables into dotted keys
    pub fn from_toml_str(content: &str) -> Result<Self, SettingsError> {
        let table: toml::Table = toml::from_str(content)?;
        let mut values = BTreeMap::new();
        flatten("", table, &mut values);
        Ok(Self { values })
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.values.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// Every setting under `prefix`, with the prefix stripped
    pub fn get_settings(&self, prefix: &str) -> BTreeMap<String, Value> {
        self.values
            .iter()
            .filter_map(|(key, value)| {
                key.strip_prefix(prefix)
                    .filter(|rest| !rest.is_empty())
                    .map(|rest| (rest.to_string(), value.clone()))
            })
            .collect()
    }

    /// Deserialize the settings under `prefix` into `T`
    pub fn section<T: DeserializeOwned>(&self, prefix: &str) -> Result<T, SettingsError> {
        let table: toml::Table = self.get_settings(prefix).into_iter().collect();
        Ok(Value::Table(table).try_into()?)
    }
}

/// Interpret a setting as a boolean
///
/// Accepts native booleans, integers (non-zero is true) and the strings
/// `true/false`, `yes/no`, `on/off`, `y/n`, `1/0` in any case.
pub fn as_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Boolean(b) => Some(*b),
        Value::Integer(i) => Some(*i != 0),
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "yes" | "on" | "y" | "t" | "1" => Some(true),
            "false" | "no" | "off" | "n" | "f" | "0" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

fn deserialize_bool<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    as_bool(&value).ok_or_else(|| de::Error::custom(format!("expected a boolean, got {}", value)))
}

/// Mirror settings under the `pypi.` prefix
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MirrorSettings {
    /// Lifetime of cached remote lookups in seconds; absent caches forever
    pub cache_time: Option<i64>,
    #[serde(deserialize_with = "deserialize_bool")]
    pub prefer_wheel: bool,
    pub trusted_host: String,
    /// Offer wheels for every platform
    #[serde(deserialize_with = "deserialize_bool")]
    pub include_incompatible: bool,
    /// `python-abi-platform` tags accepted when `include_incompatible` is off
    pub supported_tags: Vec<String>,
}

impl Default for MirrorSettings {
    fn default() -> Self {
        Self {
            cache_time: None,
            prefer_wheel: true,
            trusted_host: DEFAULT_TRUSTED_HOST.to_string(),
            include_incompatible: true,
            supported_tags: Vec::new(),
        }
    }
}

impl MirrorSettings {
    pub const PREFIX: &'static str = "pypi.";

    pub fn from_settings(settings: &Settings) -> Result<Self, SettingsError> {
        settings.section(Self::PREFIX)
    }

    /// Build the candidate selection config
    pub fn locator_config(&self) -> Result<LocatorConfig, SettingsError> {
        let compatibility = if self.include_incompatible {
            Compatibility::AcceptAll
        } else {
            let mut tags = TagSet::new();
            for tag in &self.supported_tags {
                match tag.splitn(3, '-').collect::<Vec<_>>().as_slice() {
                    [python, abi, platform] => tags.insert(python, abi, platform),
                    _ => {
                        return Err(SettingsError::Invalid {
                            key: format!("{}supported_tags", Self::PREFIX),
                            message: format!("expected python-abi-platform, got '{}'", tag),
                        })
                    }
                }
            }
            Compatibility::Tags(tags)
        };

        Ok(LocatorConfig {
            prefer_binary: self.prefer_wheel,
            trusted_host: self.trusted_host.clone(),
            compatibility,
        })
    }

    /// Build a cache with the configured lifetime
    pub fn timed_cache<K, V>(&self) -> Result<TimedCache<K, V>, CacheError>
    where
        K: Eq + Hash + Debug,
        V: Clone,
    {
        TimedCache::new(self.cache_time)
    }
}
