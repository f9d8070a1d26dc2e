//! # Configuration
//!
//! A minimal string key/value store. Keys are dotted (`http.port`,
//! `storage.root`) and every value is a string; typed reads happen on a
//! [`VidConfigSnapshot`].
//!
//! ## Setting and reading values
//! ```rust
//! use vid_core::VidConfig;
//! let mut config = VidConfig::new();
//!
//! config.set("storage.backend", "memory");
//! config.set("storage.max_upload_mb", "512");
//!
//! let snapshot = config.snapshot();
//! assert_eq!(snapshot.get("storage.backend"), Some("memory"));
//! assert_eq!(snapshot.get_u64("storage.max_upload_mb"), Some(512));
//! ```
//!
//! ## Environment overrides
//! [`VidConfig::load_env`] copies every variable starting with a prefix,
//! lower-cased, with `__` turned into `.`:
//!
//! ```bash
//! export VIDSTORE__STORAGE__ROOT=/var/lib/vidstore  # storage.root
//! ```

use std::collections::HashMap;

/// Prefix for environment overrides.
pub const ENV_PREFIX: &str = "VIDSTORE__";

#[derive(Debug, Default)]
pub struct VidConfig {
    values: HashMap<String, String>,
}

impl VidConfig {
    /// Create an empty config store.
    pub fn new() -> Self {
        Self {
            values: HashMap::new(),
        }
    }

    /// Set a configuration key to a string value.
    pub fn set<K, V>(&mut self, key: K, value: V)
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.values.insert(key.into(), value.into());
    }

    /// Set a key only when nothing has set it yet.
    pub fn set_default<K, V>(&mut self, key: K, value: V)
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.values.entry(key.into()).or_insert_with(|| value.into());
    }

    /// Get a configuration value by key.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(|s| s.as_str())
    }

    /// Check whether a key is present.
    pub fn has(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Copy every `<prefix>A__B=value` variable into `a.b`.
    pub fn load_env(&mut self, prefix: &str) {
        self.load_vars(prefix, std::env::vars());
    }

    /// Same as [`load_env`](Self::load_env) over an explicit set of variables.
    pub fn load_vars<I>(&mut self, prefix: &str, vars: I)
    where
        I: IntoIterator<Item = (String, String)>,
    {
        for (key, value) in vars {
            if let Some(stripped) = key.strip_prefix(prefix) {
                let normalized = stripped.to_lowercase().replace("__", ".");
                self.set(normalized, value);
            }
        }
    }

    pub fn snapshot(&self) -> VidConfigSnapshot {
        VidConfigSnapshot::new(self.values.clone())
    }
}

#[derive(Debug, Clone, Default)]
pub struct VidConfigSnapshot {
    map: HashMap<String, String>,
}

impl VidConfigSnapshot {
    pub(crate) fn new(map: HashMap<String, String>) -> Self {
        Self { map }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.map.get(key).map(|s| s.as_str())
    }

    pub fn get_string(&self, key: &str) -> Option<String> {
        self.map.get(key).cloned()
    }

    pub fn get_u64(&self, key: &str) -> Option<u64> {
        self.get(key).and_then(|v| v.trim().parse::<u64>().ok())
    }

    pub fn get_usize(&self, key: &str) -> Option<usize> {
        self.get(key).and_then(|v| v.trim().parse::<usize>().ok())
    }

    pub fn get_u16(&self, key: &str) -> Option<u16> {
        self.get(key).and_then(|v| v.trim().parse::<u16>().ok())
    }

    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.get(key).and_then(|v| match v.trim().to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => Some(true),
            "false" | "0" | "no" | "off" => Some(false),
            _ => None,
        })
    }
}
