//! Per-dispatch state handed to command handlers.

use crate::{ArgumentValue, Token};
use derive_getters::Getters;
use emmy_core::{GameProfile, Permissible, Vector3};
use emmy_error::{HandlerError, ResultKind, TokenSpan};
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

/// Cooperative cancellation signal for a dispatch.
///
/// The dispatcher checks the flag between steps up to the point where the handler
/// starts. Clones share the same flag.
#[derive(Debug, Clone, Default)]
pub struct CancellationFlag(Arc<AtomicBool>);

impl CancellationFlag {
    /// Create an unset flag.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    /// Whether cancellation was requested.
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// An argument matched and resolved during dispatch.
#[derive(Debug, Clone, PartialEq, Getters)]
pub struct ParsedArgument {
    /// Argument node name
    name: String,
    /// Span of the consumed tokens in the raw input
    span: TokenSpan,
    /// Consumed token text
    raw: String,
    /// Resolved value
    value: ArgumentValue,
}

impl ParsedArgument {
    pub(crate) fn new(name: String, span: TokenSpan, raw: String, value: ArgumentValue) -> Self {
        Self {
            name,
            span,
            raw,
            value,
        }
    }
}

/// Everything a handler can see about the dispatch that invoked it.
///
/// Created for a single dispatch and dropped when it ends.
pub struct DispatchContext {
    executor: Arc<dyn Permissible>,
    input: String,
    tokens: Vec<Token>,
    arguments: Vec<ParsedArgument>,
    remaining_from: usize,
    cancellation: CancellationFlag,
}

impl DispatchContext {
    pub(crate) fn new(
        executor: Arc<dyn Permissible>,
        input: String,
        tokens: Vec<Token>,
        arguments: Vec<ParsedArgument>,
        remaining_from: usize,
        cancellation: CancellationFlag,
    ) -> Self {
        Self {
            executor,
            input,
            tokens,
            arguments,
            remaining_from,
            cancellation,
        }
    }

    /// Who issued the command.
    pub fn executor(&self) -> &dyn Permissible {
        self.executor.as_ref()
    }

    /// Shared handle to the executor.
    pub fn executor_arc(&self) -> Arc<dyn Permissible> {
        Arc::clone(&self.executor)
    }

    /// Raw input as submitted.
    pub fn input(&self) -> &str {
        &self.input
    }

    /// Every token of the input.
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// Resolved arguments in path order.
    pub fn arguments(&self) -> &[ParsedArgument] {
        &self.arguments
    }

    /// Tokens after the matched path, passed through when unregistered arguments
    /// are allowed.
    pub fn remaining(&self) -> &[Token] {
        self.tokens.get(self.remaining_from..).unwrap_or_default()
    }

    /// Raw input covered by [`remaining`](Self::remaining), quotes included.
    pub fn remaining_text(&self) -> Option<&str> {
        let first = self.remaining().first()?;
        self.input.get(first.span().start..).map(str::trim_end)
    }

    /// Whether the dispatch was cancelled.
    pub fn is_cancelled(&self) -> bool {
        self.cancellation.is_cancelled()
    }

    /// Resolved value of the named argument.
    pub fn argument(&self, name: &str) -> Option<&ArgumentValue> {
        self.arguments
            .iter()
            .find(|argument| argument.name == name)
            .map(|argument| &argument.value)
    }

    /// Resolved value of the named argument, or a handler error naming it.
    ///
    /// # Errors
    ///
    /// Returns an [`ResultKind::InvalidSyntax`] error if the argument was not
    /// matched.
    #[track_caller]
    pub fn required(&self, name: &str) -> Result<&ArgumentValue, HandlerError> {
        match self.argument(name) {
            Some(value) => Ok(value),
            None => Err(HandlerError::with_kind(
                ResultKind::InvalidSyntax,
                format!("Missing argument '{}'", name),
            )),
        }
    }

    /// Text of a word, string or choice argument.
    pub fn string(&self, name: &str) -> Option<&str> {
        self.argument(name).and_then(ArgumentValue::as_str)
    }

    /// Integer argument.
    pub fn integer(&self, name: &str) -> Option<i64> {
        self.argument(name).and_then(ArgumentValue::as_integer)
    }

    /// Decimal argument.
    pub fn float(&self, name: &str) -> Option<f64> {
        self.argument(name).and_then(ArgumentValue::as_float)
    }

    /// Boolean argument.
    pub fn boolean(&self, name: &str) -> Option<bool> {
        self.argument(name).and_then(ArgumentValue::as_bool)
    }

    /// Duration argument.
    pub fn duration(&self, name: &str) -> Option<Duration> {
        self.argument(name).and_then(ArgumentValue::as_duration)
    }

    /// Coordinate argument.
    pub fn vector3(&self, name: &str) -> Option<Vector3> {
        self.argument(name).and_then(ArgumentValue::as_vector3)
    }

    /// Player argument.
    pub fn profile(&self, name: &str) -> Option<&GameProfile> {
        self.argument(name).and_then(ArgumentValue::as_profile)
    }
}

impl fmt::Debug for DispatchContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DispatchContext")
            .field("executor", &self.executor.name())
            .field("input", &self.input)
            .field("arguments", &self.arguments)
            .field("remaining", &self.remaining())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenize;
    use emmy_core::ConsoleSender;

    fn context(input: &str, remaining_from: usize) -> DispatchContext {
        let tokens = tokenize(input).unwrap();
        let arguments = vec![ParsedArgument::new(
            "amount".to_string(),
            tokens[1].span(),
            tokens[1].text().to_string(),
            ArgumentValue::Integer(5),
        )];
        DispatchContext::new(
            Arc::new(ConsoleSender),
            input.to_string(),
            tokens,
            arguments,
            remaining_from,
            CancellationFlag::new(),
        )
    }

    #[test]
    fn test_typed_accessors() {
        let ctx = context("give 5", 2);
        assert_eq!(ctx.integer("amount"), Some(5));
        assert_eq!(ctx.float("amount"), Some(5.0));
        assert_eq!(ctx.string("amount"), None);
        assert!(ctx.required("missing").is_err());
        assert!(ctx.remaining().is_empty());
        assert_eq!(ctx.remaining_text(), None);
        assert_eq!(ctx.executor().name(), "CONSOLE");
    }

    #[test]
    fn test_remaining_text_keeps_quotes() {
        let ctx = context("give 5 'extra words' more  ", 2);
        assert_eq!(ctx.remaining().len(), 2);
        assert_eq!(ctx.remaining_text(), Some("'extra words' more"));
    }

    #[test]
    fn test_cancellation_is_shared() {
        let flag = CancellationFlag::new();
        let clone = flag.clone();
        clone.cancel();
        assert!(flag.is_cancelled());
    }
}
