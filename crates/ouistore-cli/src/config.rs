//! TOML configuration for the `ouistore` CLI.

use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Top-level configuration, parsed from TOML.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    /// Store location and backend.
    pub store: StoreSection,
    /// Feed ingestion settings.
    pub ingest: IngestSection,
    /// Logging configuration.
    pub log: LogSection,
}

/// `[store]` section.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct StoreSection {
    /// Directory holding the shard files.
    pub data_dir: PathBuf,
}

impl Default for StoreSection {
    fn default() -> Self {
        let data_dir = dirs::home_dir()
            .map(|h| h.join(".ouistore"))
            .unwrap_or_else(|| PathBuf::from(".ouistore"));
        Self { data_dir }
    }
}

/// `[ingest]` section.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct IngestSection {
    /// Directory holding the feed files.
    pub feed_dir: Option<PathBuf>,
}

/// `[log]` section.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LogSection {
    /// Log level filter (e.g. `"info"`, `"debug"`).
    pub level: String,
}

impl Default for LogSection {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl CliConfig {
    /// Load a config file, or defaults when no path is given.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        match path {
            Some(path) => {
                let raw = std::fs::read_to_string(path)?;
                Ok(toml::from_str(&raw)?)
            }
            None => Ok(Self::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = CliConfig::default();
        assert!(config.store.data_dir.ends_with(".ouistore"));
        assert_eq!(config.ingest.feed_dir, None);
        assert_eq!(config.log.level, "info");
    }

    #[test]
    fn test_parse_partial_toml() {
        let config: CliConfig = toml::from_str(
            r#"
            [store]
            data_dir = "/var/lib/ouistore"

            [ingest]
            feed_dir = "/srv/feeds"
            "#,
        )
        .unwrap();
        assert_eq!(config.store.data_dir, PathBuf::from("/var/lib/ouistore"));
        assert_eq!(config.ingest.feed_dir, Some(PathBuf::from("/srv/feeds")));
        // Untouched section falls back to its default.
        assert_eq!(config.log.level, "info");
    }

    #[test]
    fn test_load_missing_path_uses_defaults() {
        let config = CliConfig::load(None).unwrap();
        assert_eq!(config.log.level, "info");
    }
}
