//! Serde helpers for durations written in the compact grammar.
//!
//! Accepts either an integer number of seconds or a string such as `"5m"` or
//! `"1h30m"`; serializes to the short string form.
//!
//! ```
//! use serde::Deserialize;
//! use std::time::Duration;
//!
//! #[derive(Deserialize)]
//! struct Settings {
//!     #[serde(with = "emmy_core::serde_duration")]
//!     ttl: Duration,
//! }
//!
//! let settings: Settings = serde_json::from_str(r#"{ "ttl": "1h30m" }"#).unwrap();
//! assert_eq!(settings.ttl, Duration::from_secs(5_400));
//! let settings: Settings = serde_json::from_str(r#"{ "ttl": 45 }"#).unwrap();
//! assert_eq!(settings.ttl, Duration::from_secs(45));
//! ```

use crate::{parse_duration, short_duration};
use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serializer};
use std::fmt;
use std::time::Duration;

struct DurationVisitor;

impl<'de> Visitor<'de> for DurationVisitor {
    type Value = Duration;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a number of seconds or a duration such as \"5m\"")
    }

    fn visit_u64<E: de::Error>(self, value: u64) -> Result<Duration, E> {
        Ok(Duration::from_secs(value))
    }

    fn visit_i64<E: de::Error>(self, value: i64) -> Result<Duration, E> {
        u64::try_from(value)
            .map(Duration::from_secs)
            .map_err(|_| E::custom(format!("duration cannot be negative: {}", value)))
    }

    fn visit_f64<E: de::Error>(self, value: f64) -> Result<Duration, E> {
        if value.is_sign_negative() || !value.is_finite() {
            return Err(E::custom(format!("invalid duration: {}", value)));
        }
        Ok(Duration::from_secs(value.round() as u64))
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<Duration, E> {
        parse_duration(value).ok_or_else(|| E::custom(format!("invalid duration: '{}'", value)))
    }
}

struct CompactDuration(Duration);

impl<'de> Deserialize<'de> for CompactDuration {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(DurationVisitor).map(CompactDuration)
    }
}

/// Serialize a duration in the short compact form.
pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&short_duration(*duration))
}

/// Deserialize a duration from seconds or the compact grammar.
pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
    CompactDuration::deserialize(deserializer).map(|d| d.0)
}

/// Same helpers for `Option<Duration>` fields.
pub mod option {
    use super::CompactDuration;
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    /// Serialize an optional duration.
    pub fn serialize<S: Serializer>(
        duration: &Option<Duration>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match duration {
            Some(duration) => super::serialize(duration, serializer),
            None => serializer.serialize_none(),
        }
    }

    /// Deserialize an optional duration.
    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<Duration>, D::Error> {
        Option::<CompactDuration>::deserialize(deserializer).map(|d| d.map(|d| d.0))
    }
}
