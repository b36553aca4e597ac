//! Identity cache configuration.

use derive_getters::Getters;
use emmy_core::{CoreSettings, serde_duration};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for [`crate::IdentityCache`].
///
/// # Example
///
/// ```
/// use emmy_cache::IdentityCacheConfigBuilder;
/// use std::time::Duration;
///
/// let config = IdentityCacheConfigBuilder::default()
///     .capacity(64usize)
///     .ttl(Duration::from_secs(30))
///     .build()
///     .unwrap();
/// assert_eq!(*config.capacity(), 64);
/// assert_eq!(*config.sweep_interval(), None);
/// ```
#[derive(
    Debug,
    Clone,
    PartialEq,
    Serialize,
    Deserialize,
    Getters,
    derive_setters::Setters,
    derive_builder::Builder,
)]
#[setters(prefix = "with_")]
pub struct IdentityCacheConfig {
    /// Maximum number of live entries
    #[serde(default = "default_capacity")]
    #[builder(default = "default_capacity()")]
    capacity: usize,

    /// Age after which an entry is treated as absent
    #[serde(default = "default_ttl", with = "serde_duration")]
    #[builder(default = "default_ttl()")]
    ttl: Duration,

    /// Interval for the optional background sweep
    #[serde(default, with = "serde_duration::option")]
    #[builder(default)]
    sweep_interval: Option<Duration>,
}

fn default_capacity() -> usize {
    1000
}

fn default_ttl() -> Duration {
    Duration::from_secs(300) // 5 minutes
}

impl Default for IdentityCacheConfig {
    fn default() -> Self {
        Self {
            capacity: default_capacity(),
            ttl: default_ttl(),
            sweep_interval: None,
        }
    }
}

impl From<&CoreSettings> for IdentityCacheConfig {
    fn from(settings: &CoreSettings) -> Self {
        Self {
            capacity: *settings.cache_capacity(),
            ttl: *settings.cache_ttl(),
            sweep_interval: *settings.sweep_interval(),
        }
    }
}
