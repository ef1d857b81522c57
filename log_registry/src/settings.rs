// Settings read from a TOML file, flattened to dotted keys.
//
// `[logs]\nutc = true` and `logs.utc = true` both land under `logs.utc`.
// A stored value always wins over the caller's default as long as the key is
// present and parses, including "falsy" values like `false`, `0` or an empty
// string. The default is only used when the key is absent or unparseable.

use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use toml::{Table, Value};

use crate::error::SettingsError;

#[derive(Debug, Clone, Default)]
pub struct Settings {
    values: HashMap<String, String>,
}

impl Settings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let content = fs::read_to_string(path)?;
        let settings = Self::parse(&content)?;
        log::debug!("Loaded {} settings from {}", settings.values.len(), path.display());
        Ok(settings)
    }

    pub fn parse(content: &str) -> Result<Self, SettingsError> {
        let table: Table = toml::from_str(content)?;
        let mut settings = Self::new();
        settings.flatten("", &table);
        Ok(settings)
    }

    fn flatten(&mut self, prefix: &str, table: &Table) {
        for (key, value) in table {
            let key = if prefix.is_empty() {
                key.clone()
            } else {
                format!("{prefix}.{key}")
            };
            match value {
                Value::Table(inner) => self.flatten(&key, inner),
                Value::String(s) => self.set(&key, s),
                other => self.set(&key, &other.to_string()),
            }
        }
    }

    pub fn set(&mut self, key: &str, value: &str) {
        self.values.insert(key.to_string(), value.to_string());
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// The stored value for `key`, if present and parseable as `T`.
    pub fn get_opt<T: FromStr>(&self, key: &str) -> Option<T> {
        let raw = self.values.get(key)?;
        match raw.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                log::warn!("Ignoring unparseable setting {key} = {raw:?}");
                None
            }
        }
    }

    pub fn get<T: FromStr>(&self, key: &str, default: T) -> T {
        self.get_opt(key).unwrap_or(default)
    }
}
