//! Compact duration arguments.

use super::{ArgumentType, ArgumentValue, invalid, span_of};
use crate::Token;
use async_trait::async_trait;
use emmy_core::{DURATION_EXAMPLES, duration_scale_suggestions, parse_duration, short_duration};
use emmy_error::{ArgumentErrorKind, ArgumentResolutionError};
use std::time::Duration;

/// Duration in the compact grammar (`12d`, `25mins`, `1h30m`).
///
/// The minimum is inclusive and the maximum, if any, exclusive. Several components
/// separated by spaces must be quoted to form one token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DurationArgument {
    min: Duration,
    max: Option<Duration>,
}

/// Any duration.
pub fn duration() -> DurationArgument {
    DurationArgument {
        min: Duration::ZERO,
        max: None,
    }
}

/// A duration in `min..max`.
///
/// # Examples
///
/// ```
/// use emmy_command::ArgumentType;
/// use emmy_command::argument::duration_range;
/// use std::time::Duration;
///
/// let ban = duration_range(Duration::from_secs(60), Duration::from_secs(86_400));
/// assert_eq!(ban.describe(), "duration(1m..1d)");
/// assert_eq!(ban.suggest("30"), vec!["30y", "30mo", "30w", "30d", "30h", "30m", "30s"]);
/// ```
pub fn duration_range(min: Duration, max: Duration) -> DurationArgument {
    DurationArgument {
        min,
        max: Some(max),
    }
}

fn parse(tokens: &[Token]) -> Option<Duration> {
    match tokens {
        [token] => parse_duration(token.text()),
        _ => None,
    }
}

#[async_trait]
impl ArgumentType for DurationArgument {
    fn type_name(&self) -> &'static str {
        "duration"
    }

    fn describe(&self) -> String {
        match self.max {
            None if self.min.is_zero() => "duration".to_string(),
            None => format!("duration({}..)", short_duration(self.min)),
            Some(max) => format!("duration({}..{})", short_duration(self.min), short_duration(max)),
        }
    }

    fn validate(&self, tokens: &[Token]) -> bool {
        parse(tokens).is_some()
    }

    async fn resolve(
        &self,
        argument: &str,
        tokens: &[Token],
    ) -> Result<ArgumentValue, ArgumentResolutionError> {
        let value = parse(tokens).ok_or_else(|| invalid(argument, tokens, "a duration"))?;
        if value < self.min {
            return Err(ArgumentResolutionError::new(
                argument,
                span_of(tokens),
                ArgumentErrorKind::DurationTooSmall {
                    found: short_duration(value),
                    min: short_duration(self.min),
                },
            ));
        }
        if let Some(max) = self.max.filter(|max| value >= *max) {
            return Err(ArgumentResolutionError::new(
                argument,
                span_of(tokens),
                ArgumentErrorKind::DurationTooBig {
                    found: short_duration(value),
                    max: short_duration(max),
                },
            ));
        }
        Ok(ArgumentValue::Duration(value))
    }

    fn suggest(&self, partial: &str) -> Vec<String> {
        duration_scale_suggestions(partial)
    }

    fn examples(&self) -> Vec<String> {
        DURATION_EXAMPLES.iter().map(|example| example.to_string()).collect()
    }
}
