//! Boundary between the core and a host platform.

use crate::{DispatchOutcome, Dispatcher, describe_error};
use async_trait::async_trait;
use emmy_core::Permissible;
use emmy_error::ResultKind;
use std::sync::Arc;

/// Per-host adapter that feeds raw input to a [`Dispatcher`] and renders results.
///
/// Each host wraps its native sender in a [`Permissible`] and picks an output type
/// its chat or console API understands.
///
/// # Example Implementation
///
/// ```
/// use emmy_command::{DispatchOutcome, Dispatcher, PlatformAdapter, render_plain};
///
/// struct Terminal {
///     dispatcher: Dispatcher,
/// }
///
/// impl PlatformAdapter for Terminal {
///     type Output = String;
///
///     fn platform(&self) -> &str {
///         "terminal"
///     }
///
///     fn dispatcher(&self) -> &Dispatcher {
///         &self.dispatcher
///     }
///
///     fn render_result(&self, outcome: &DispatchOutcome) -> String {
///         render_plain(outcome)
///     }
/// }
/// ```
#[async_trait]
pub trait PlatformAdapter: Send + Sync {
    /// Rendered form of a dispatch outcome.
    type Output: Send;

    /// Name of the host platform.
    fn platform(&self) -> &str;

    /// Dispatcher that handles submitted input.
    fn dispatcher(&self) -> &Dispatcher;

    /// Dispatch raw input for `executor`.
    async fn submit(&self, raw_input: &str, executor: Arc<dyn Permissible>) -> DispatchOutcome {
        self.dispatcher().execute(raw_input, executor).await
    }

    /// Render an outcome for the executor.
    fn render_result(&self, outcome: &DispatchOutcome) -> Self::Output;
}

/// Plain text rendering of an outcome.
///
/// Successful commands render their message (or nothing); failures render a
/// description of exactly what went wrong.
///
/// # Examples
///
/// ```
/// use emmy_command::{CommandOutput, DispatchOutcome, render_plain};
/// use emmy_error::{DispatchError, ParseError, ParseErrorKind};
///
/// let done = DispatchOutcome::Completed(CommandOutput::success_with("Teleported"));
/// assert_eq!(render_plain(&done), "Teleported");
///
/// let err: DispatchError = ParseError::new(ParseErrorKind::EmptyInput).into();
/// assert_eq!(render_plain(&DispatchOutcome::Failed(err)), "Invalid command: Input is empty");
/// ```
pub fn render_plain(outcome: &DispatchOutcome) -> String {
    match outcome {
        DispatchOutcome::Completed(output) => output.message().clone().unwrap_or_default(),
        DispatchOutcome::Failed(err) => match err.result_kind() {
            ResultKind::InvalidSyntax => format!("Invalid command: {}", describe_error(err)),
            _ => format!("Error: {}", describe_error(err)),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use emmy_error::{DispatchError, HandlerError, PermissionDeniedError};

    #[test]
    fn test_render_failures() {
        let denied: DispatchError = PermissionDeniedError::new("ban", "ban").into();
        assert_eq!(
            render_plain(&DispatchOutcome::Failed(denied)),
            "Error: You do not have permission to use 'ban'"
        );

        let handler: DispatchError =
            HandlerError::with_kind(ResultKind::InvalidSyntax, "World name required").into();
        assert_eq!(
            render_plain(&DispatchOutcome::Failed(handler)),
            "Invalid command: World name required"
        );

        assert_eq!(
            render_plain(&DispatchOutcome::Failed(DispatchError::closed())),
            "Error: Commands are no longer accepted"
        );
    }

    #[test]
    fn test_render_silent_success() {
        let outcome = DispatchOutcome::Completed(crate::CommandOutput::success());
        assert_eq!(render_plain(&outcome), "");
    }
}
