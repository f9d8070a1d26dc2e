use std::path::PathBuf;

use anyhow::{bail, Result};
use vid_blob::BlobConfig;
use vid_core::{Locator, VidConfig, VidConfigSnapshot, ENV_PREFIX};

/// Where committed video content lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageBackend {
    Fs(PathBuf),
    Memory,
}

/// Everything the server needs to start, resolved from configuration.
#[derive(Debug, Clone)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub locator: Locator,
    pub storage: StorageBackend,
    pub blob: BlobConfig,
}

impl ServerSettings {
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn from_config(config: &VidConfig) -> Result<Self> {
        Self::from_snapshot(&config.snapshot())
    }

    pub fn from_snapshot(snap: &VidConfigSnapshot) -> Result<Self> {
        let host = snap
            .get_string("http.host")
            .unwrap_or_else(|| "127.0.0.1".to_string());
        let port = typed(snap, "http.port", "a port number", VidConfigSnapshot::get_u16)?
            .unwrap_or(3030);

        let locator = match snap.get("http.public_url") {
            Some(base) => Locator::new(base)?,
            None => Locator::from_host_port(&host, port)?,
        };

        let storage = match snap.get("storage.backend").unwrap_or("fs") {
            "fs" => StorageBackend::Fs(
                snap.get("storage.root")
                    .map(PathBuf::from)
                    .unwrap_or_else(|| PathBuf::from("./data")),
            ),
            "memory" => StorageBackend::Memory,
            other => bail!("storage.backend must be `fs` or `memory`, got {other:?}"),
        };

        let mut blob = BlobConfig::default();
        if let Some(mb) = typed(snap, "storage.max_upload_mb", "a whole number", VidConfigSnapshot::get_u64)? {
            blob = blob.with_max_blob_bytes(mb.saturating_mul(1024 * 1024));
        }
        if let Some(kb) = typed(snap, "storage.chunk_kb", "a whole number", VidConfigSnapshot::get_usize)? {
            blob = blob.with_chunk_size(kb.saturating_mul(1024));
        }
        if let Some(checksum) = typed(snap, "storage.checksum", "true or false", VidConfigSnapshot::get_bool)? {
            blob = blob.with_checksum(checksum);
        }

        Ok(Self {
            host,
            port,
            locator,
            storage,
            blob,
        })
    }
}

/// Read an optional key, failing when it is set but does not parse.
fn typed<T>(
    snap: &VidConfigSnapshot,
    key: &str,
    expected: &str,
    read: impl Fn(&VidConfigSnapshot, &str) -> Option<T>,
) -> Result<Option<T>> {
    match snap.get(key) {
        None => Ok(None),
        Some(raw) => match read(snap, key) {
            Some(value) => Ok(Some(value)),
            None => bail!("{key} must be {expected}, got {raw:?}"),
        },
    }
}

/// Configuration from `VIDSTORE__*` variables, with the plain `HTTP_HOST`
/// and `HTTP_PORT` used when the prefixed keys are absent.
pub fn config_from_env() -> VidConfig {
    let mut config = VidConfig::new();
    config.load_env(ENV_PREFIX);

    if let Ok(host) = std::env::var("HTTP_HOST") {
        config.set_default("http.host", host);
    }
    if let Ok(port) = std::env::var("HTTP_PORT") {
        config.set_default("http.port", port);
    }
    config
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let settings = ServerSettings::from_config(&VidConfig::new()).unwrap();

        assert_eq!(settings.addr(), "127.0.0.1:3030");
        assert_eq!(settings.locator.base(), "http://127.0.0.1:3030");
        assert_eq!(settings.storage, StorageBackend::Fs(PathBuf::from("./data")));
        assert!(settings.blob.checksum);
    }

    #[test]
    fn explicit_values() {
        let mut config = VidConfig::new();
        config.set("http.host", "0.0.0.0");
        config.set("http.port", "80");
        config.set("http.public_url", "https://videos.example.org/");
        config.set("storage.backend", "memory");
        config.set("storage.max_upload_mb", "10");
        config.set("storage.chunk_kb", "256");
        config.set("storage.checksum", "false");

        let settings = ServerSettings::from_config(&config).unwrap();
        assert_eq!(settings.locator.base(), "https://videos.example.org");
        assert_eq!(settings.storage, StorageBackend::Memory);
        assert_eq!(settings.blob.max_blob_bytes, 10 * 1024 * 1024);
        assert_eq!(settings.blob.chunk_size, 256 * 1024);
        assert!(!settings.blob.checksum);
    }

    #[test]
    fn port_80_is_left_out_of_locator() {
        let mut config = VidConfig::new();
        config.set("http.host", "videos.local");
        config.set("http.port", "80");

        let settings = ServerSettings::from_config(&config).unwrap();
        assert_eq!(settings.locator.base(), "http://videos.local");
    }

    #[test]
    fn bad_values_are_rejected() {
        let mut config = VidConfig::new();
        config.set("storage.backend", "s3");
        assert!(ServerSettings::from_config(&config).is_err());

        let mut config = VidConfig::new();
        config.set("http.port", "eighty");
        assert!(ServerSettings::from_config(&config).is_err());

        let mut config = VidConfig::new();
        config.set("http.public_url", "videos.example.org");
        assert!(ServerSettings::from_config(&config).is_err());

        for (key, value) in [
            ("storage.max_upload_mb", "lots"),
            ("storage.chunk_kb", "-4"),
            ("storage.checksum", "maybe"),
        ] {
            let mut config = VidConfig::new();
            config.set(key, value);
            let err = ServerSettings::from_config(&config).unwrap_err();
            assert!(err.to_string().contains(key), "{err}");
        }
    }
}
