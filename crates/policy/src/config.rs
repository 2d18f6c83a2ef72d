//! Engine configuration loaded from TOML.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::{Error, Result};

/// Top-level engine configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub cache: CacheConfig,
}

/// Ability cache sizing and expiry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Maximum number of cached abilities.
    pub capacity: u64,

    /// Drop entries this many seconds after they were resolved.
    pub time_to_live_secs: Option<u64>,

    /// Drop entries not read for this many seconds.
    pub time_to_idle_secs: Option<u64>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            capacity: CacheConfig::DEFAULT_CAPACITY,
            time_to_live_secs: None,
            time_to_idle_secs: None,
        }
    }
}

impl CacheConfig {
    pub const DEFAULT_CAPACITY: u64 = 10_000;

    pub fn with_capacity(capacity: u64) -> Self {
        Self {
            capacity,
            ..Default::default()
        }
    }

    pub fn time_to_live(&self) -> Option<Duration> {
        self.time_to_live_secs.map(Duration::from_secs)
    }

    pub fn time_to_idle(&self) -> Option<Duration> {
        self.time_to_idle_secs.map(Duration::from_secs)
    }

    pub fn validate(&self) -> Result<()> {
        if self.capacity == 0 {
            return Err(Error::Invalid("cache.capacity must be at least 1".to_string()));
        }
        if self.time_to_live_secs == Some(0) {
            return Err(Error::Invalid(
                "cache.time_to_live_secs must be positive".to_string(),
            ));
        }
        if self.time_to_idle_secs == Some(0) {
            return Err(Error::Invalid(
                "cache.time_to_idle_secs must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

impl EngineConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::parse(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(toml: &str) -> Result<Self> {
        let config: Self = toml::from_str(toml).map_err(|e| Error::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.cache.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = EngineConfig::parse("").unwrap();
        assert_eq!(config, EngineConfig::default());
        assert_eq!(config.cache.capacity, CacheConfig::DEFAULT_CAPACITY);
        assert_eq!(config.cache.time_to_live(), None);
    }

    #[test]
    fn test_parse_toml() {
        let toml = r#"
[cache]
capacity = 500
time_to_live_secs = 900
"#;
        let config = EngineConfig::parse(toml).unwrap();
        assert_eq!(config.cache.capacity, 500);
        assert_eq!(config.cache.time_to_live(), Some(Duration::from_secs(900)));
        assert_eq!(config.cache.time_to_idle(), None);
    }

    #[test]
    fn test_zero_capacity_is_invalid() {
        let err = EngineConfig::parse("[cache]\ncapacity = 0\n").unwrap_err();
        assert!(matches!(err, Error::Invalid(_)));
    }

    #[test]
    fn test_zero_ttl_is_invalid() {
        let err = EngineConfig::parse("[cache]\ntime_to_idle_secs = 0\n").unwrap_err();
        assert!(matches!(err, Error::Invalid(_)));
    }

    #[test]
    fn test_malformed_toml() {
        let err = EngineConfig::parse("[cache\ncapacity = 1").unwrap_err();
        assert!(matches!(err, Error::Parse(_)));
    }

    #[test]
    fn test_load_missing_file() {
        let err = EngineConfig::load("/nonexistent/warden.toml").unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }
}
