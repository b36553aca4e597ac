//! Per-dispatch error wrapper.

use crate::{ArgumentResolutionError, HandlerError, ParseError, PermissionDeniedError, ResultKind, TokenSpan};

/// Every way a single dispatch can fail.
#[derive(Debug, Clone, derive_more::From, derive_more::Display, derive_more::Error)]
pub enum DispatchErrorKind {
    /// Tokenization or path mismatch
    #[from(ParseError)]
    Parse(ParseError),
    /// An argument could not be resolved
    #[from(ArgumentResolutionError)]
    Argument(ArgumentResolutionError),
    /// A permission predicate rejected the executor
    #[from(PermissionDeniedError)]
    PermissionDenied(PermissionDeniedError),
    /// The command handler reported a failure
    #[from(HandlerError)]
    Handler(HandlerError),
    /// The platform adapter cancelled the dispatch before execution
    #[display("Dispatch cancelled before execution")]
    Cancelled,
    /// The dispatcher no longer accepts input
    #[display("Dispatcher is closed")]
    Closed,
}

/// Dispatch error with kind discrimination.
///
/// # Examples
///
/// ```
/// use emmy_error::{DispatchError, DispatchErrorKind, ParseError, ParseErrorKind};
///
/// let err: DispatchError = ParseError::new(ParseErrorKind::EmptyInput).into();
/// assert!(matches!(err.kind(), DispatchErrorKind::Parse(_)));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Dispatch Error: {}", _0)]
pub struct DispatchError(Box<DispatchErrorKind>);

impl DispatchError {
    /// Create a new error from a kind.
    pub fn new(kind: DispatchErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Error for a dispatch cancelled by its platform adapter.
    pub fn cancelled() -> Self {
        Self::new(DispatchErrorKind::Cancelled)
    }

    /// Error for a dispatch submitted after close.
    pub fn closed() -> Self {
        Self::new(DispatchErrorKind::Closed)
    }

    /// Get the error kind.
    pub fn kind(&self) -> &DispatchErrorKind {
        &self.0
    }

    /// Result category a platform adapter should report for this failure.
    pub fn result_kind(&self) -> ResultKind {
        match self.kind() {
            DispatchErrorKind::Parse(_) | DispatchErrorKind::Argument(_) => {
                ResultKind::InvalidSyntax
            }
            DispatchErrorKind::Handler(err) => err.kind,
            _ => ResultKind::Failure,
        }
    }

    /// Span of the offending input, when the failure is tied to a token.
    pub fn span(&self) -> Option<TokenSpan> {
        match self.kind() {
            DispatchErrorKind::Parse(err) => err.span,
            DispatchErrorKind::Argument(err) => Some(err.span),
            _ => None,
        }
    }
}

impl<T> From<T> for DispatchError
where
    T: Into<DispatchErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ArgumentErrorKind, ParseErrorKind};

    #[test]
    fn test_result_kind_mapping() {
        let parse: DispatchError = ParseError::new(ParseErrorKind::EmptyInput).into();
        assert_eq!(parse.result_kind(), ResultKind::InvalidSyntax);

        let denied: DispatchError = PermissionDeniedError::new("ban", "ban").into();
        assert_eq!(denied.result_kind(), ResultKind::Failure);

        let handler: DispatchError =
            HandlerError::with_kind(ResultKind::InvalidSyntax, "bad world").into();
        assert_eq!(handler.result_kind(), ResultKind::InvalidSyntax);

        assert_eq!(DispatchError::cancelled().result_kind(), ResultKind::Failure);
    }

    #[test]
    fn test_span_follows_kind() {
        let err: DispatchError = ArgumentResolutionError::new(
            "count",
            TokenSpan::new(5, 7),
            ArgumentErrorKind::Invalid {
                expected: "integer".to_string(),
                found: "xx".to_string(),
            },
        )
        .into();
        assert_eq!(err.span(), Some(TokenSpan::new(5, 7)));
        assert_eq!(DispatchError::closed().span(), None);
    }
}
