//! Argument resolution errors.

use crate::{ResolutionError, TokenSpan};

/// Specific reasons an argument token could not be turned into a value.
#[derive(Debug, Clone, derive_more::Display)]
pub enum ArgumentErrorKind {
    /// The token does not have the expected shape
    #[display("Expected {} but found '{}'", expected, found)]
    Invalid {
        /// Human readable description of the expected input
        expected: String,
        /// Text that was found
        found: String,
    },
    /// Numeric value outside the accepted bounds
    #[display("Value {} is outside the range {}..={}", found, min, max)]
    OutOfRange {
        /// Parsed value
        found: String,
        /// Lower bound
        min: String,
        /// Upper bound
        max: String,
    },
    /// Value is not one of a fixed set
    #[display("Unknown value '{}', expected one of: {}", value, choices)]
    UnknownChoice {
        /// Text that was found
        value: String,
        /// Comma separated accepted values
        choices: String,
    },
    /// Duration shorter than the inclusive minimum
    #[display("Duration must not be less than {}, found {}", min, found)]
    DurationTooSmall {
        /// Parsed duration, short format
        found: String,
        /// Minimum, short format
        min: String,
    },
    /// Duration at or above the exclusive maximum
    #[display("Duration must be less than {}, found {}", max, found)]
    DurationTooBig {
        /// Parsed duration, short format
        found: String,
        /// Maximum, short format
        max: String,
    },
    /// The identity resolver failed for this argument
    #[display("Lookup failed: {}", _0)]
    Resolver(ResolutionError),
}

/// Argument resolution error naming the failing argument and its token span.
///
/// Resolver failures are exposed through [`std::error::Error::source`].
///
/// # Examples
///
/// ```
/// use emmy_error::{ArgumentErrorKind, ArgumentResolutionError, TokenSpan};
///
/// let err = ArgumentResolutionError::new(
///     "amount",
///     TokenSpan::new(5, 8),
///     ArgumentErrorKind::Invalid {
///         expected: "integer".to_string(),
///         found: "abc".to_string(),
///     },
/// );
/// assert_eq!(err.argument, "amount");
/// assert!(format!("{}", err).contains("Expected integer"));
/// ```
#[derive(Debug, Clone, derive_more::Display)]
#[display(
    "Argument Error: '{}' at {}: {} at line {} in {}",
    argument,
    span,
    kind,
    line,
    file
)]
pub struct ArgumentResolutionError {
    /// Name of the argument node that failed
    pub argument: String,
    /// Span of the token(s) consumed by the argument
    pub span: TokenSpan,
    /// The specific error condition
    pub kind: ArgumentErrorKind,
    /// Line number where the error occurred
    pub line: u32,
    /// Source file where the error occurred
    pub file: &'static str,
}

impl ArgumentResolutionError {
    /// Create a new ArgumentResolutionError with automatic location tracking.
    #[track_caller]
    pub fn new(argument: impl Into<String>, span: TokenSpan, kind: ArgumentErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            argument: argument.into(),
            span,
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// The resolver failure behind this error, if any.
    pub fn resolution_error(&self) -> Option<&ResolutionError> {
        match &self.kind {
            ArgumentErrorKind::Resolver(err) => Some(err),
            _ => None,
        }
    }
}

impl std::error::Error for ArgumentResolutionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.resolution_error()
            .map(|err| err as &(dyn std::error::Error + 'static))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ResolutionErrorKind;
    use std::error::Error;

    #[test]
    fn test_resolver_failure_is_source() {
        let cause = ResolutionError::new(ResolutionErrorKind::Timeout("5s".to_string()));
        let err = ArgumentResolutionError::new(
            "target",
            TokenSpan::new(3, 10),
            ArgumentErrorKind::Resolver(cause),
        );
        let source = err.source().expect("resolver failure should be the source");
        assert!(source.to_string().contains("timed out"));
    }

    #[test]
    fn test_plain_failure_has_no_source() {
        let err = ArgumentResolutionError::new(
            "count",
            TokenSpan::new(0, 1),
            ArgumentErrorKind::OutOfRange {
                found: "0".to_string(),
                min: "1".to_string(),
                max: "64".to_string(),
            },
        );
        assert!(err.source().is_none());
        assert!(err.resolution_error().is_none());
    }
}
