//! Typed command arguments.
//!
//! Every argument node in a grammar tree carries an [`ArgumentType`], which decides
//! whether upcoming tokens fit the argument (`validate`), turns them into an
//! [`ArgumentValue`] (`resolve`), and optionally offers completions (`suggest`).
//!
//! Built-in types are created with the functions in this module:
//!
//! | Function | Tokens | Value |
//! |----------|--------|-------|
//! | [`word`] | 1 unquoted | [`ArgumentValue::Word`] |
//! | [`string`] | 1 | [`ArgumentValue::Text`] |
//! | [`integer`], [`integer_range`] | 1 | [`ArgumentValue::Integer`] |
//! | [`float`], [`float_range`] | 1 | [`ArgumentValue::Float`] |
//! | [`boolean`] | 1 | [`ArgumentValue::Bool`] |
//! | [`choice()`] | 1 | [`ArgumentValue::Choice`] |
//! | [`duration()`], [`duration_range`] | 1 | [`ArgumentValue::Duration`] |
//! | [`vector3`] | 3 | [`ArgumentValue::Vector3`] |
//! | [`player()`] | 1 | [`ArgumentValue::Profile`] |

mod choice;
mod duration;
mod player;
mod primitive;
mod vector;

pub use choice::{ChoiceArgument, choice};
pub use duration::{DurationArgument, duration, duration_range};
pub use player::{PlayerArgument, player};
pub use primitive::{
    BooleanArgument, FloatArgument, IntegerArgument, StringArgument, WordArgument, boolean,
    float, float_range, integer, integer_range, string, word,
};
pub use vector::{Vector3Argument, vector3};

use crate::Token;
use async_trait::async_trait;
use emmy_core::{GameProfile, Vector3};
use emmy_error::{ArgumentErrorKind, ArgumentResolutionError, TokenSpan};
use std::fmt;
use std::time::Duration;

/// Capabilities of an argument kind.
///
/// `validate` must be cheap and side-effect free; the dispatcher calls it while
/// walking the tree to pick a branch. `resolve` may perform I/O (for example an
/// identity lookup) and reports precise errors.
///
/// # Example Implementation
///
/// ```
/// use async_trait::async_trait;
/// use emmy_command::{ArgumentType, ArgumentValue, Token};
/// use emmy_error::ArgumentResolutionError;
///
/// #[derive(Debug)]
/// struct Hex;
///
/// #[async_trait]
/// impl ArgumentType for Hex {
///     fn type_name(&self) -> &'static str {
///         "hex"
///     }
///
///     fn validate(&self, tokens: &[Token]) -> bool {
///         tokens.len() == 1 && i64::from_str_radix(tokens[0].text(), 16).is_ok()
///     }
///
///     async fn resolve(
///         &self,
///         _argument: &str,
///         tokens: &[Token],
///     ) -> Result<ArgumentValue, ArgumentResolutionError> {
///         Ok(ArgumentValue::Integer(
///             i64::from_str_radix(tokens[0].text(), 16).unwrap_or_default(),
///         ))
///     }
/// }
/// ```
#[async_trait]
pub trait ArgumentType: fmt::Debug + Send + Sync {
    /// Short name used in usage strings, e.g. `integer`.
    fn type_name(&self) -> &'static str;

    /// Full description including any bounds.
    ///
    /// Two argument nodes with the same name can only be merged when their
    /// descriptions are equal.
    fn describe(&self) -> String {
        self.type_name().to_string()
    }

    /// Number of tokens the argument consumes.
    fn token_count(&self) -> usize {
        1
    }

    /// Whether `tokens` (exactly [`Self::token_count`] of them) fit this argument.
    fn validate(&self, tokens: &[Token]) -> bool;

    /// Turn validated tokens into a value.
    async fn resolve(
        &self,
        argument: &str,
        tokens: &[Token],
    ) -> Result<ArgumentValue, ArgumentResolutionError>;

    /// Completions for a partially typed token.
    fn suggest(&self, _partial: &str) -> Vec<String> {
        Vec::new()
    }

    /// Sample inputs, for help output.
    fn examples(&self) -> Vec<String> {
        Vec::new()
    }
}

/// Resolved value of an argument.
#[derive(Debug, Clone, PartialEq)]
pub enum ArgumentValue {
    /// Single unquoted word
    Word(String),
    /// Free text, possibly quoted
    Text(String),
    /// Whole number
    Integer(i64),
    /// Decimal number
    Float(f64),
    /// `true` or `false`
    Bool(bool),
    /// Compact duration
    Duration(Duration),
    /// Three-component coordinate
    Vector3(Vector3),
    /// Canonical spelling of a fixed choice
    Choice(String),
    /// Identity resolved for a player name
    Profile(GameProfile),
}

impl ArgumentValue {
    /// Text for word, text and choice values.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Word(text) | Self::Text(text) | Self::Choice(text) => Some(text),
            _ => None,
        }
    }

    /// Integer value.
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Self::Integer(value) => Some(*value),
            _ => None,
        }
    }

    /// Decimal value; integers are widened.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(value) => Some(*value),
            Self::Integer(value) => Some(*value as f64),
            _ => None,
        }
    }

    /// Boolean value.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(value) => Some(*value),
            _ => None,
        }
    }

    /// Duration value.
    pub fn as_duration(&self) -> Option<Duration> {
        match self {
            Self::Duration(value) => Some(*value),
            _ => None,
        }
    }

    /// Coordinate value.
    pub fn as_vector3(&self) -> Option<Vector3> {
        match self {
            Self::Vector3(value) => Some(*value),
            _ => None,
        }
    }

    /// Resolved profile.
    pub fn as_profile(&self) -> Option<&GameProfile> {
        match self {
            Self::Profile(profile) => Some(profile),
            _ => None,
        }
    }
}

/// Span covering every token an argument consumed.
pub(crate) fn span_of(tokens: &[Token]) -> TokenSpan {
    match (tokens.first(), tokens.last()) {
        (Some(first), Some(last)) => first.span().join(last.span()),
        _ => TokenSpan::default(),
    }
}

/// Text of every token an argument consumed, space separated.
pub(crate) fn text_of(tokens: &[Token]) -> String {
    tokens
        .iter()
        .map(Token::text)
        .collect::<Vec<_>>()
        .join(" ")
}

#[track_caller]
pub(crate) fn invalid(argument: &str, tokens: &[Token], expected: &str) -> ArgumentResolutionError {
    ArgumentResolutionError::new(
        argument,
        span_of(tokens),
        ArgumentErrorKind::Invalid {
            expected: expected.to_string(),
            found: text_of(tokens),
        },
    )
}

/// Keep the candidates that start with `partial`, ignoring ASCII case.
pub(crate) fn filter_prefix<I, S>(candidates: I, partial: &str) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let partial = partial.to_lowercase();
    candidates
        .into_iter()
        .map(Into::into)
        .filter(|candidate| candidate.to_lowercase().starts_with(&partial))
        .collect()
}

#[cfg(test)]
pub(crate) fn tokens(input: &str) -> Vec<Token> {
    crate::tokenize(input).unwrap()
}
