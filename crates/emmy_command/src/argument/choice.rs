//! Fixed set of case-insensitive choices.

use super::{ArgumentType, ArgumentValue, filter_prefix, invalid, span_of};
use crate::Token;
use async_trait::async_trait;
use emmy_error::{ArgumentErrorKind, ArgumentResolutionError};

/// One of a fixed set of values, matched ignoring case.
///
/// Resolves to the canonical spelling given at construction.
///
/// # Examples
///
/// ```
/// use emmy_command::ArgumentType;
/// use emmy_command::argument::choice;
///
/// let mode = choice(["survival", "creative", "adventure", "spectator"]);
/// assert_eq!(mode.suggest("s"), vec!["survival", "spectator"]);
/// assert_eq!(mode.describe(), "choice(survival|creative|adventure|spectator)");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChoiceArgument {
    choices: Vec<String>,
}

/// One of `choices`, case-insensitive.
pub fn choice<I, S>(choices: I) -> ChoiceArgument
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    ChoiceArgument {
        choices: choices.into_iter().map(Into::into).collect(),
    }
}

impl ChoiceArgument {
    /// Accepted values in declaration order.
    pub fn choices(&self) -> &[String] {
        &self.choices
    }

    fn find(&self, text: &str) -> Option<&String> {
        self.choices
            .iter()
            .find(|candidate| candidate.eq_ignore_ascii_case(text))
    }
}

#[async_trait]
impl ArgumentType for ChoiceArgument {
    fn type_name(&self) -> &'static str {
        "choice"
    }

    fn describe(&self) -> String {
        format!("choice({})", self.choices.join("|"))
    }

    // Any single token is taken so an unknown value gets a precise error
    fn validate(&self, tokens: &[Token]) -> bool {
        matches!(tokens, [token] if !token.text().is_empty())
    }

    async fn resolve(
        &self,
        argument: &str,
        tokens: &[Token],
    ) -> Result<ArgumentValue, ArgumentResolutionError> {
        let [token] = tokens else {
            return Err(invalid(argument, tokens, "a single value"));
        };
        match self.find(token.text()) {
            Some(canonical) => Ok(ArgumentValue::Choice(canonical.clone())),
            None => Err(ArgumentResolutionError::new(
                argument,
                span_of(tokens),
                ArgumentErrorKind::UnknownChoice {
                    value: token.text().to_string(),
                    choices: self.choices.join(", "),
                },
            )),
        }
    }

    fn suggest(&self, partial: &str) -> Vec<String> {
        filter_prefix(self.choices.iter().cloned(), partial)
    }

    fn examples(&self) -> Vec<String> {
        self.choices.iter().take(3).cloned().collect()
    }
}
