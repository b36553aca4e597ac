//! Word, string, numeric and boolean arguments.

use super::{ArgumentType, ArgumentValue, filter_prefix, invalid, span_of};
use crate::Token;
use async_trait::async_trait;
use emmy_error::{ArgumentErrorKind, ArgumentResolutionError};

/// A single unquoted word.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WordArgument;

/// A single unquoted word.
pub fn word() -> WordArgument {
    WordArgument
}

#[async_trait]
impl ArgumentType for WordArgument {
    fn type_name(&self) -> &'static str {
        "word"
    }

    fn validate(&self, tokens: &[Token]) -> bool {
        matches!(tokens, [token] if !token.is_quoted() && !token.text().is_empty())
    }

    async fn resolve(
        &self,
        argument: &str,
        tokens: &[Token],
    ) -> Result<ArgumentValue, ArgumentResolutionError> {
        match tokens {
            [token] if !token.is_quoted() => Ok(ArgumentValue::Word(token.text().to_string())),
            _ => Err(invalid(argument, tokens, "a single word")),
        }
    }

    fn examples(&self) -> Vec<String> {
        vec!["word".to_string(), "words_with_underscores".to_string()]
    }
}

/// One token, which may be a quoted run containing whitespace.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StringArgument;

/// One token, quoted or not.
pub fn string() -> StringArgument {
    StringArgument
}

#[async_trait]
impl ArgumentType for StringArgument {
    fn type_name(&self) -> &'static str {
        "string"
    }

    fn validate(&self, tokens: &[Token]) -> bool {
        tokens.len() == 1
    }

    async fn resolve(
        &self,
        argument: &str,
        tokens: &[Token],
    ) -> Result<ArgumentValue, ArgumentResolutionError> {
        match tokens {
            [token] => Ok(ArgumentValue::Text(token.text().to_string())),
            _ => Err(invalid(argument, tokens, "a string")),
        }
    }

    fn examples(&self) -> Vec<String> {
        vec!["word".to_string(), "\"quoted phrase\"".to_string()]
    }
}

/// Whole number within inclusive bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntegerArgument {
    min: i64,
    max: i64,
}

/// Any `i64`.
pub fn integer() -> IntegerArgument {
    integer_range(i64::MIN, i64::MAX)
}

/// An `i64` in `min..=max`.
pub fn integer_range(min: i64, max: i64) -> IntegerArgument {
    IntegerArgument { min, max }
}

fn parse_integer(tokens: &[Token]) -> Option<i64> {
    match tokens {
        [token] => token.text().parse().ok(),
        _ => None,
    }
}

#[async_trait]
impl ArgumentType for IntegerArgument {
    fn type_name(&self) -> &'static str {
        "integer"
    }

    fn describe(&self) -> String {
        if self.min == i64::MIN && self.max == i64::MAX {
            "integer".to_string()
        } else {
            format!("integer({}..={})", self.min, self.max)
        }
    }

    // Bounds are checked in `resolve` so out-of-range input gets a precise error
    fn validate(&self, tokens: &[Token]) -> bool {
        parse_integer(tokens).is_some()
    }

    async fn resolve(
        &self,
        argument: &str,
        tokens: &[Token],
    ) -> Result<ArgumentValue, ArgumentResolutionError> {
        let value = parse_integer(tokens).ok_or_else(|| invalid(argument, tokens, "an integer"))?;
        if !(self.min..=self.max).contains(&value) {
            return Err(ArgumentResolutionError::new(
                argument,
                span_of(tokens),
                ArgumentErrorKind::OutOfRange {
                    found: value.to_string(),
                    min: self.min.to_string(),
                    max: self.max.to_string(),
                },
            ));
        }
        Ok(ArgumentValue::Integer(value))
    }

    fn examples(&self) -> Vec<String> {
        vec!["0".to_string(), "123".to_string(), "-123".to_string()]
    }
}

/// Finite decimal number within inclusive bounds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FloatArgument {
    min: f64,
    max: f64,
}

/// Any finite `f64`.
pub fn float() -> FloatArgument {
    float_range(f64::MIN, f64::MAX)
}

/// A finite `f64` in `min..=max`.
pub fn float_range(min: f64, max: f64) -> FloatArgument {
    FloatArgument { min, max }
}

fn parse_float(tokens: &[Token]) -> Option<f64> {
    match tokens {
        [token] => token.text().parse::<f64>().ok().filter(|value| value.is_finite()),
        _ => None,
    }
}

#[async_trait]
impl ArgumentType for FloatArgument {
    fn type_name(&self) -> &'static str {
        "float"
    }

    fn describe(&self) -> String {
        if self.min == f64::MIN && self.max == f64::MAX {
            "float".to_string()
        } else {
            format!("float({}..={})", self.min, self.max)
        }
    }

    fn validate(&self, tokens: &[Token]) -> bool {
        parse_float(tokens).is_some()
    }

    async fn resolve(
        &self,
        argument: &str,
        tokens: &[Token],
    ) -> Result<ArgumentValue, ArgumentResolutionError> {
        let value = parse_float(tokens).ok_or_else(|| invalid(argument, tokens, "a number"))?;
        if value < self.min || value > self.max {
            return Err(ArgumentResolutionError::new(
                argument,
                span_of(tokens),
                ArgumentErrorKind::OutOfRange {
                    found: value.to_string(),
                    min: self.min.to_string(),
                    max: self.max.to_string(),
                },
            ));
        }
        Ok(ArgumentValue::Float(value))
    }

    fn examples(&self) -> Vec<String> {
        vec!["0".to_string(), "1.2".to_string(), ".5".to_string(), "-1".to_string()]
    }
}

/// `true` or `false`, case-insensitive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BooleanArgument;

/// `true` or `false`.
pub fn boolean() -> BooleanArgument {
    BooleanArgument
}

fn parse_bool(tokens: &[Token]) -> Option<bool> {
    match tokens {
        [token] if token.text().eq_ignore_ascii_case("true") => Some(true),
        [token] if token.text().eq_ignore_ascii_case("false") => Some(false),
        _ => None,
    }
}

#[async_trait]
impl ArgumentType for BooleanArgument {
    fn type_name(&self) -> &'static str {
        "boolean"
    }

    fn validate(&self, tokens: &[Token]) -> bool {
        parse_bool(tokens).is_some()
    }

    async fn resolve(
        &self,
        argument: &str,
        tokens: &[Token],
    ) -> Result<ArgumentValue, ArgumentResolutionError> {
        parse_bool(tokens)
            .map(ArgumentValue::Bool)
            .ok_or_else(|| invalid(argument, tokens, "true or false"))
    }

    fn suggest(&self, partial: &str) -> Vec<String> {
        filter_prefix(["true", "false"], partial)
    }

    fn examples(&self) -> Vec<String> {
        vec!["true".to_string(), "false".to_string()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::argument::tokens;

    #[tokio::test]
    async fn test_word_rejects_quoted() {
        assert!(word().validate(&tokens("hello")));
        assert!(!word().validate(&tokens("'hello'")));
        assert!(string().validate(&tokens("'hello there'")));
    }

    #[tokio::test]
    async fn test_integer_range_reports_bounds() {
        let amount = integer_range(1, 64);
        assert!(amount.validate(&tokens("100")));
        let err = amount.resolve("amount", &tokens("100")).await.unwrap_err();
        assert!(matches!(err.kind, ArgumentErrorKind::OutOfRange { .. }));
        assert_eq!(
            amount.resolve("amount", &tokens("64")).await.unwrap(),
            ArgumentValue::Integer(64)
        );
        assert_eq!(amount.describe(), "integer(1..=64)");
        assert_eq!(integer().describe(), "integer");
    }

    #[tokio::test]
    async fn test_float_rejects_non_finite() {
        assert!(!float().validate(&tokens("NaN")));
        assert!(!float().validate(&tokens("inf")));
        assert_eq!(
            float().resolve("speed", &tokens("-1.5")).await.unwrap(),
            ArgumentValue::Float(-1.5)
        );
    }

    #[tokio::test]
    async fn test_boolean() {
        assert_eq!(
            boolean().resolve("flag", &tokens("TRUE")).await.unwrap(),
            ArgumentValue::Bool(true)
        );
        assert!(!boolean().validate(&tokens("yes")));
        assert_eq!(boolean().suggest("f"), vec!["false"]);
        assert_eq!(boolean().suggest(""), vec!["true", "false"]);
    }
}
