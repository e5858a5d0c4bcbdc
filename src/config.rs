use config::{Config, ConfigError, File};
use serde::Deserialize;
use std::collections::HashSet;

use crate::formats;

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub scan_directory: String,
    pub allowed_extensions: HashSet<String>,
    pub num_workers: usize,
    pub log_level: String,
    pub open_retry_attempts: u32,
    pub open_retry_backoff_ms: u64,
}

impl AppConfig {
    /// Layered load: built-in defaults, then `config/default`, an optional
    /// RUN_MODE overlay, and `config/local`. Every key has a default so the
    /// tool runs with no config files at all.
    pub fn new() -> Result<Self, ConfigError> {
        let env = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = Config::builder()
            .set_default("scan_directory", ".")?
            .set_default("allowed_extensions", formats::KNOWN_EXTENSIONS.to_vec())?
            .set_default("num_workers", 0)?
            .set_default("log_level", "info")?
            .set_default("open_retry_attempts", 5)?
            .set_default("open_retry_backoff_ms", 100)?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(File::with_name("config/local").required(false))
            .build()?;

        s.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_cover_every_key() {
        let config = AppConfig::new().unwrap();
        assert_eq!(config.open_retry_attempts, 5);
        assert_eq!(config.open_retry_backoff_ms, 100);
    }

    #[test]
    fn default_allow_list_matches_the_dispatcher() {
        let config = AppConfig::new().unwrap();
        for ext in formats::KNOWN_EXTENSIONS {
            assert!(config.allowed_extensions.contains(ext), "{}", ext);
        }
    }
}
