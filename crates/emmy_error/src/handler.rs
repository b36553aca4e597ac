//! Command handler failures.

/// Outcome category reported back to the platform adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, derive_more::Display)]
pub enum ResultKind {
    /// The command ran and succeeded
    #[default]
    #[display("success")]
    Success,
    /// The command ran (or tried to) and failed
    #[display("failure")]
    Failure,
    /// The input did not form a valid command
    #[display("invalid syntax")]
    InvalidSyntax,
}

impl ResultKind {
    /// Whether this kind counts as a success.
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }
}

/// Domain failure raised by a command's own handler.
///
/// The dispatcher surfaces it to the platform adapter unchanged.
///
/// # Examples
///
/// ```
/// use emmy_error::{HandlerError, ResultKind};
///
/// let err = HandlerError::new("Target is offline");
/// assert_eq!(err.kind, ResultKind::Failure);
///
/// let err = HandlerError::with_kind(ResultKind::InvalidSyntax, "Missing world name");
/// assert_eq!(err.message, "Missing world name");
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Handler Error: {} at line {} in {}", message, line, file)]
pub struct HandlerError {
    /// Result category to report
    pub kind: ResultKind,
    /// Message produced by the handler
    pub message: String,
    /// Line number where the error occurred
    pub line: u32,
    /// Source file where the error occurred
    pub file: &'static str,
}

impl HandlerError {
    /// Create a failure with the given message.
    #[track_caller]
    pub fn new(message: impl Into<String>) -> Self {
        Self::with_kind(ResultKind::Failure, message)
    }

    /// Create an error reporting a specific result kind.
    #[track_caller]
    pub fn with_kind(kind: ResultKind, message: impl Into<String>) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            message: message.into(),
            line: location.line(),
            file: location.file(),
        }
    }
}
