//! Tokenization and path matching errors.

use crate::TokenSpan;

/// Specific conditions that stop input from matching any command path.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum ParseErrorKind {
    /// Nothing to dispatch after trimming
    #[display("Input is empty")]
    EmptyInput,
    /// A quoted run was never closed
    #[display("Unclosed quote starting at offset {}", _0)]
    UnclosedQuote(usize),
    /// A closing quote was followed directly by more text
    #[display("Expected whitespace after closing quote at offset {}", _0)]
    ExpectedWhitespace(usize),
    /// Escape sequence other than `\\`, `\"` or `\'`
    #[display("Invalid escape sequence '\\{}'", _0)]
    InvalidEscape(char),
    /// The first token does not name a registered command
    #[display("Unknown command '{}'", _0)]
    UnknownCommand(String),
    /// A token below the root matched no child of the current node
    #[display("Unexpected token '{}' after '{}'", token, after)]
    UnexpectedToken {
        /// Offending token text
        token: String,
        /// Path matched so far
        after: String,
    },
    /// Input ended at a node that has no handler
    #[display("Incomplete command '{}'", _0)]
    IncompleteCommand(String),
}

/// Parse error with the failing token span and location tracking.
///
/// # Examples
///
/// ```
/// use emmy_error::{ParseError, ParseErrorKind, TokenSpan};
///
/// let err = ParseError::new(ParseErrorKind::UnknownCommand("tpa".to_string()))
///     .with_span(TokenSpan::new(0, 3));
/// assert_eq!(err.span, Some(TokenSpan::new(0, 3)));
/// assert!(format!("{}", err).contains("Unknown command 'tpa'"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Parse Error: {} at line {} in {}", kind, line, file)]
pub struct ParseError {
    /// The specific error condition
    pub kind: ParseErrorKind,
    /// Span of the failing token, when one exists
    pub span: Option<TokenSpan>,
    /// Line number where the error occurred
    pub line: u32,
    /// Source file where the error occurred
    pub file: &'static str,
}

impl ParseError {
    /// Create a new ParseError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: ParseErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            span: None,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Attach the span of the failing token.
    pub fn with_span(mut self, span: TokenSpan) -> Self {
        self.span = Some(span);
        self
    }
}
