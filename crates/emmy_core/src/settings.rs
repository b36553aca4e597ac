//! Static settings handed to the core at construction.
//!
//! Settings are layered with the following precedence (highest first):
//! - an explicit file passed to [`CoreSettings::load_with`]
//! - `EMMY_*` environment variables
//! - `./emmy.{toml,yaml,json}`
//! - `~/.config/emmy/emmy.{toml,yaml,json}`
//! - bundled defaults (`emmy.toml` shipped with this crate)

use crate::serde_duration;
use derive_getters::Getters;
use emmy_error::{ConfigError, EmmyResult};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, instrument, warn};

/// Bundled default configuration.
const DEFAULT_SETTINGS: &str = include_str!("../emmy.toml");

/// Settings recognized by the command core.
///
/// # Example
///
/// ```toml
/// cache_capacity = 500
/// cache_ttl = "10m"
/// allow_unregistered_arguments = true
/// sweep_interval = "1m"
/// ```
///
/// The camelCase names `cacheCapacity`, `cacheTtl`, `allowUnregisteredArguments` and
/// `sweepInterval` are accepted as aliases.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Getters, derive_setters::Setters)]
#[setters(prefix = "with_")]
pub struct CoreSettings {
    /// Maximum number of identity records kept in memory
    #[serde(
        default = "default_cache_capacity",
        alias = "cacheCapacity",
        alias = "cachecapacity"
    )]
    cache_capacity: usize,

    /// Age after which a cached identity is treated as absent
    #[serde(
        default = "default_cache_ttl",
        with = "serde_duration",
        alias = "cacheTtl",
        alias = "cachettl"
    )]
    cache_ttl: Duration,

    /// Hand unmatched trailing tokens to executable commands instead of failing
    #[serde(
        default,
        alias = "allowUnregisteredArguments",
        alias = "allowunregisteredarguments"
    )]
    allow_unregistered_arguments: bool,

    /// Interval of the background sweep for expired entries (disabled when absent)
    #[serde(
        default,
        with = "serde_duration::option",
        skip_serializing_if = "Option::is_none",
        alias = "sweepInterval",
        alias = "sweepinterval"
    )]
    sweep_interval: Option<Duration>,
}

fn default_cache_capacity() -> usize {
    1000
}

fn default_cache_ttl() -> Duration {
    Duration::from_secs(300) // 5 minutes
}

impl Default for CoreSettings {
    fn default() -> Self {
        Self {
            cache_capacity: default_cache_capacity(),
            cache_ttl: default_cache_ttl(),
            allow_unregistered_arguments: false,
            sweep_interval: None,
        }
    }
}

impl CoreSettings {
    /// Load settings from the bundled defaults, user files and environment.
    ///
    /// # Errors
    ///
    /// Returns error if a present file cannot be parsed or the merged settings are
    /// invalid.
    pub fn load() -> EmmyResult<Self> {
        Self::load_with(None::<&Path>)
    }

    /// Load settings, with `path` (if any) taking precedence over every other source.
    ///
    /// The format of `path` is inferred from its extension (`toml`, `yaml`/`yml`, `json`).
    #[instrument(skip_all)]
    pub fn load_with<P: AsRef<Path>>(path: Option<P>) -> EmmyResult<Self> {
        use config::{Config, Environment, File, FileFormat};

        debug!("Loading settings with precedence: file > env > current dir > home dir > bundled defaults");

        let mut builder =
            Config::builder().add_source(File::from_str(DEFAULT_SETTINGS, FileFormat::Toml));

        if let Some(config_dir) = dirs::config_dir() {
            let home_settings = config_dir.join("emmy").join("emmy");
            if let Some(home_settings) = home_settings.to_str() {
                builder = builder.add_source(File::with_name(home_settings).required(false));
            }
        }

        builder = builder
            .add_source(File::with_name("emmy").required(false))
            .add_source(Environment::with_prefix("EMMY"));

        if let Some(path) = path {
            builder = builder.add_source(File::from(path.as_ref()).required(true));
        }

        let settings: CoreSettings = builder
            .build()
            .map_err(|e| ConfigError::new(format!("Failed to build settings: {}", e)))?
            .try_deserialize()
            .map_err(|e| ConfigError::new(format!("Failed to parse settings: {}", e)))?;

        settings.validate()?;
        debug!(
            cache_capacity = settings.cache_capacity,
            cache_ttl = ?settings.cache_ttl,
            allow_unregistered_arguments = settings.allow_unregistered_arguments,
            "Settings loaded"
        );
        Ok(settings)
    }

    /// Load settings from a single file, ignoring every other source.
    ///
    /// Missing keys fall back to their defaults.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn from_file<P: AsRef<Path>>(path: P) -> EmmyResult<Self> {
        let settings: CoreSettings = config::Config::builder()
            .add_source(config::File::from(path.as_ref()).required(true))
            .build()
            .map_err(|e| ConfigError::new(format!("Failed to read settings: {}", e)))?
            .try_deserialize()
            .map_err(|e| ConfigError::new(format!("Failed to parse settings: {}", e)))?;
        settings.validate()?;
        Ok(settings)
    }

    /// Check invariants the core relies on.
    ///
    /// # Errors
    ///
    /// Returns error if the cache capacity or TTL is zero.
    pub fn validate(&self) -> EmmyResult<()> {
        if self.cache_capacity == 0 {
            return Err(ConfigError::invalid_setting("cache_capacity", "must be at least 1").into());
        }
        if self.cache_ttl.is_zero() {
            return Err(ConfigError::invalid_setting("cache_ttl", "must be greater than zero").into());
        }
        if self.sweep_interval.is_some_and(|interval| interval.is_zero()) {
            return Err(ConfigError::invalid_setting("sweep_interval", "must be greater than zero").into());
        }
        if self.allow_unregistered_arguments {
            warn!("Unregistered trailing arguments will be passed to command handlers");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_bundled_file() {
        let bundled: CoreSettings = toml_like_defaults();
        assert_eq!(bundled, CoreSettings::default());
    }

    fn toml_like_defaults() -> CoreSettings {
        config::Config::builder()
            .add_source(config::File::from_str(DEFAULT_SETTINGS, config::FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap()
    }

    #[test]
    fn test_validate_rejects_zero_capacity() {
        let settings = CoreSettings::default().with_cache_capacity(0);
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_ttl() {
        let settings = CoreSettings::default().with_cache_ttl(Duration::ZERO);
        let err = settings.validate().unwrap_err();
        assert!(err.to_string().contains("'cache_ttl' must be greater than zero"));
    }

    #[test]
    fn test_camel_case_aliases() {
        let settings: CoreSettings = serde_json::from_str(
            r#"{ "cacheCapacity": 2, "cacheTtl": "30s", "allowUnregisteredArguments": true }"#,
        )
        .unwrap();
        assert_eq!(*settings.cache_capacity(), 2);
        assert_eq!(*settings.cache_ttl(), Duration::from_secs(30));
        assert!(*settings.allow_unregistered_arguments());
        assert_eq!(*settings.sweep_interval(), None);
    }
}
