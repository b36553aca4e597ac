//! Input tokenizer.

use emmy_error::{ParseError, ParseErrorKind, TokenSpan};
use tracing::trace;

/// A single token of raw command input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    text: String,
    span: TokenSpan,
    quoted: bool,
}

impl Token {
    /// Create a token.
    pub fn new(text: impl Into<String>, span: TokenSpan, quoted: bool) -> Self {
        Self {
            text: text.into(),
            span,
            quoted,
        }
    }

    /// Token text with quotes removed and escapes applied.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Byte span in the raw input, including any quotes.
    pub fn span(&self) -> TokenSpan {
        self.span
    }

    /// Whether the token was written as a quoted run.
    pub fn is_quoted(&self) -> bool {
        self.quoted
    }
}

/// Split raw input into tokens.
///
/// Tokens are separated by whitespace. A token starting with `"` or `'` runs to the
/// matching closing quote and may contain whitespace; inside it `\\`, `\"` and `\'`
/// are the only escapes. A closing quote must be followed by whitespace or the end
/// of input. Quote characters elsewhere are ordinary characters.
///
/// # Errors
///
/// - [`ParseErrorKind::EmptyInput`] if the input holds no tokens
/// - [`ParseErrorKind::UnclosedQuote`] if a quoted run never closes
/// - [`ParseErrorKind::InvalidEscape`] for any other escape inside quotes
/// - [`ParseErrorKind::ExpectedWhitespace`] if text follows a closing quote
///
/// # Examples
///
/// ```
/// use emmy_command::tokenize;
///
/// let tokens = tokenize(r#"say "hello world""#).unwrap();
/// let texts: Vec<&str> = tokens.iter().map(|t| t.text()).collect();
/// assert_eq!(texts, vec!["say", "hello world"]);
/// assert!(tokens[1].is_quoted());
/// ```
pub fn tokenize(input: &str) -> Result<Vec<Token>, ParseError> {
    let mut tokens = Vec::new();
    let mut chars = input.char_indices().peekable();

    while let Some(&(start, c)) = chars.peek() {
        if c.is_whitespace() {
            chars.next();
            continue;
        }

        if c == '"' || c == '\'' {
            chars.next();
            let mut text = String::new();
            let mut end = None;
            while let Some((index, next)) = chars.next() {
                match next {
                    '\\' => match chars.next() {
                        Some((_, escaped)) if matches!(escaped, '\\' | '"' | '\'') => {
                            text.push(escaped)
                        }
                        Some((_, escaped)) => {
                            return Err(ParseError::new(ParseErrorKind::InvalidEscape(escaped))
                                .with_span(TokenSpan::new(index, index + 1 + escaped.len_utf8())));
                        }
                        None => break,
                    },
                    quote if quote == c => {
                        end = Some(index + quote.len_utf8());
                        break;
                    }
                    other => text.push(other),
                }
            }
            let Some(end) = end else {
                return Err(ParseError::new(ParseErrorKind::UnclosedQuote(start))
                    .with_span(TokenSpan::new(start, input.len())));
            };
            if let Some(&(index, next)) = chars.peek()
                && !next.is_whitespace()
            {
                return Err(ParseError::new(ParseErrorKind::ExpectedWhitespace(index))
                    .with_span(TokenSpan::new(index, index + next.len_utf8())));
            }
            tokens.push(Token::new(text, TokenSpan::new(start, end), true));
            continue;
        }

        let mut end = start;
        while let Some(&(index, next)) = chars.peek() {
            if next.is_whitespace() {
                break;
            }
            end = index + next.len_utf8();
            chars.next();
        }
        tokens.push(Token::new(&input[start..end], TokenSpan::new(start, end), false));
    }

    if tokens.is_empty() {
        return Err(ParseError::new(ParseErrorKind::EmptyInput));
    }
    trace!(count = tokens.len(), "Tokenized input");
    Ok(tokens)
}
