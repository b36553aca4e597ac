//! Dispatch results handed to platform adapters.

use derive_getters::Getters;
use emmy_error::{DispatchError, DispatchErrorKind, ResultKind};

/// Output of a handler that ran to completion.
///
/// # Examples
///
/// ```
/// use emmy_command::CommandOutput;
/// use emmy_error::ResultKind;
///
/// let output = CommandOutput::success_with("Teleported");
/// assert_eq!(*output.kind(), ResultKind::Success);
/// assert_eq!(output.message().as_deref(), Some("Teleported"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Getters)]
pub struct CommandOutput {
    /// Result category
    kind: ResultKind,
    /// Text for the executor, if any
    message: Option<String>,
}

impl CommandOutput {
    /// Output with an explicit kind.
    pub fn new(kind: ResultKind, message: Option<String>) -> Self {
        Self { kind, message }
    }

    /// Silent success.
    pub fn success() -> Self {
        Self::default()
    }

    /// Success with a message for the executor.
    pub fn success_with(message: impl Into<String>) -> Self {
        Self::new(ResultKind::Success, Some(message.into()))
    }

    /// A handler that ran but reports failure without raising an error.
    pub fn failure(message: impl Into<String>) -> Self {
        Self::new(ResultKind::Failure, Some(message.into()))
    }
}

/// Typed outcome of one dispatch.
#[derive(Debug, Clone, derive_more::From)]
pub enum DispatchOutcome {
    /// The handler ran and returned output
    Completed(CommandOutput),
    /// The dispatch stopped with an error
    Failed(DispatchError),
}

impl DispatchOutcome {
    /// Whether the dispatch completed with a success kind.
    pub fn is_success(&self) -> bool {
        self.result_kind().is_success()
    }

    /// Result category for the platform to report.
    pub fn result_kind(&self) -> ResultKind {
        match self {
            Self::Completed(output) => output.kind,
            Self::Failed(err) => err.result_kind(),
        }
    }

    /// Text for the executor: the handler's message, or a description of the failure.
    pub fn message(&self) -> Option<String> {
        match self {
            Self::Completed(output) => output.message.clone(),
            Self::Failed(err) => Some(describe_error(err)),
        }
    }

    /// Handler output, if the dispatch completed.
    pub fn output(&self) -> Option<&CommandOutput> {
        match self {
            Self::Completed(output) => Some(output),
            Self::Failed(_) => None,
        }
    }

    /// The error, if the dispatch failed.
    pub fn error(&self) -> Option<&DispatchError> {
        match self {
            Self::Completed(_) => None,
            Self::Failed(err) => Some(err),
        }
    }
}

impl From<Result<CommandOutput, DispatchError>> for DispatchOutcome {
    fn from(result: Result<CommandOutput, DispatchError>) -> Self {
        match result {
            Ok(output) => Self::Completed(output),
            Err(err) => Self::Failed(err),
        }
    }
}

/// User-facing description of a dispatch failure, without source locations.
///
/// # Examples
///
/// ```
/// use emmy_command::describe_error;
/// use emmy_error::{DispatchError, ParseError, ParseErrorKind, TokenSpan};
///
/// let err: DispatchError = ParseError::new(ParseErrorKind::UnknownCommand("tpa".to_string()))
///     .with_span(TokenSpan::new(0, 3))
///     .into();
/// assert_eq!(describe_error(&err), "Unknown command 'tpa' at position 0");
/// ```
pub fn describe_error(err: &DispatchError) -> String {
    match err.kind() {
        DispatchErrorKind::Parse(parse) => match parse.span {
            Some(span) => format!("{} at position {}", parse.kind, span.start),
            None => parse.kind.to_string(),
        },
        DispatchErrorKind::Argument(argument) => {
            format!("Invalid value for '{}': {}", argument.argument, argument.kind)
        }
        DispatchErrorKind::PermissionDenied(denied) => {
            format!("You do not have permission to use '{}'", denied.path)
        }
        DispatchErrorKind::Handler(handler) => handler.message.clone(),
        DispatchErrorKind::Cancelled => "Command cancelled".to_string(),
        DispatchErrorKind::Closed => "Commands are no longer accepted".to_string(),
    }
}
