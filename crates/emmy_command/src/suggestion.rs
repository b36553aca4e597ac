//! Completion results.

use derive_getters::Getters;
use emmy_error::TokenSpan;

/// A completion for the token being typed.
///
/// # Examples
///
/// ```
/// use emmy_command::Suggestion;
/// use emmy_error::TokenSpan;
///
/// let suggestion = Suggestion::new("teleport", TokenSpan::new(0, 4));
/// assert_eq!(suggestion.apply("tele Steve"), "teleport Steve");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Getters)]
pub struct Suggestion {
    /// Replacement text
    text: String,
    /// Span of the input the text replaces
    span: TokenSpan,
}

impl Suggestion {
    /// Create a suggestion replacing `span`.
    pub fn new(text: impl Into<String>, span: TokenSpan) -> Self {
        Self {
            text: text.into(),
            span,
        }
    }

    /// `input` with the span replaced by the suggestion.
    pub fn apply(&self, input: &str) -> String {
        let before = input.get(..self.span.start).unwrap_or(input);
        let after = input.get(self.span.end..).unwrap_or_default();
        format!("{}{}{}", before, self.text, after)
    }
}
