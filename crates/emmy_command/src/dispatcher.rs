//! Command dispatch.

use crate::argument::{span_of, text_of};
use crate::tree::node_path;
use crate::{
    CancellationFlag, CommandNode, CommandOutput, DispatchContext, DispatchOutcome, GrammarTree,
    NodeKind, ParsedArgument, Suggestion, Token, describe_error, tokenize,
};
use emmy_core::{CoreSettings, Permissible};
use emmy_error::{
    DispatchError, ParseError, ParseErrorKind, PermissionDeniedError, TokenSpan,
};
use std::ops::Range;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, info, instrument, trace};

/// Steps of a single dispatch.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum DispatchState {
    /// Nothing done yet
    #[display("start")]
    Start,
    /// Splitting input into tokens
    #[display("tokenizing")]
    Tokenizing,
    /// Walking the grammar tree; holds the matched usage path
    #[display("matching '{}'", _0)]
    Matching(String),
    /// Resolving argument values
    #[display("argument resolution")]
    ArgumentResolution,
    /// Evaluating permission predicates
    #[display("permission check")]
    PermissionCheck,
    /// Running the handler
    #[display("execute")]
    Execute,
    /// Handler returned
    #[display("done")]
    Done,
    /// Stopped early; holds the reason
    #[display("failed: {}", _0)]
    Failed(String),
}

/// A node matched during the walk and the tokens it consumed.
struct Step<'t> {
    node: &'t CommandNode,
    tokens: Range<usize>,
}

/// Matches raw input against a [`GrammarTree`] and runs the selected handler.
///
/// A dispatch proceeds through [`DispatchState`]s: tokenize, walk the tree, resolve
/// arguments in path order, check permissions on every matched node, then run the
/// handler synchronously. Any failure ends the dispatch with a typed
/// [`DispatchOutcome::Failed`].
///
/// The walk prefers a literal child whose name equals the next unquoted token, and
/// otherwise takes the first argument child (in registration order) whose type
/// accepts the upcoming tokens. It never backtracks.
#[derive(Debug)]
pub struct Dispatcher {
    tree: Arc<GrammarTree>,
    allow_unregistered_arguments: bool,
    closed: AtomicBool,
}

impl Dispatcher {
    /// Create a dispatcher over `tree`.
    pub fn new(tree: Arc<GrammarTree>, settings: &CoreSettings) -> Self {
        debug!(
            commands = tree.root().children().len(),
            allow_unregistered_arguments = settings.allow_unregistered_arguments(),
            "Creating dispatcher"
        );
        Self {
            tree,
            allow_unregistered_arguments: *settings.allow_unregistered_arguments(),
            closed: AtomicBool::new(false),
        }
    }

    /// The grammar this dispatcher matches against.
    pub fn tree(&self) -> &Arc<GrammarTree> {
        &self.tree
    }

    /// Whether trailing tokens are handed to executable commands.
    pub fn allows_unregistered_arguments(&self) -> bool {
        self.allow_unregistered_arguments
    }

    /// Stop accepting input.
    ///
    /// Dispatches already running finish normally; later calls fail with
    /// [`emmy_error::DispatchErrorKind::Closed`].
    pub fn close(&self) {
        if !self.closed.swap(true, Ordering::SeqCst) {
            info!("Dispatcher closed");
        }
    }

    /// Whether [`close`](Self::close) was called.
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    /// Dispatch `input` on behalf of `executor`.
    ///
    /// Setting `cancellation` before the handler starts ends the dispatch with
    /// [`emmy_error::DispatchErrorKind::Cancelled`]; a handler that already started
    /// runs to completion.
    #[instrument(skip(self, executor, cancellation), fields(executor = executor.name()))]
    pub async fn dispatch(
        &self,
        input: &str,
        executor: Arc<dyn Permissible>,
        cancellation: &CancellationFlag,
    ) -> DispatchOutcome {
        if self.is_closed() {
            debug!("Rejecting input, dispatcher is closed");
            return DispatchOutcome::Failed(DispatchError::closed());
        }

        let result = self.run(input, executor, cancellation).await;
        match &result {
            Ok(output) => debug!(kind = %output.kind(), "Dispatch completed"),
            Err(err) => {
                trace!(to = %DispatchState::Failed(describe_error(err)), "Dispatch transition");
                debug!(error = %err, "Dispatch failed")
            }
        }
        result.into()
    }

    /// Dispatch without external cancellation.
    pub async fn execute(&self, input: &str, executor: Arc<dyn Permissible>) -> DispatchOutcome {
        self.dispatch(input, executor, &CancellationFlag::new()).await
    }

    /// Completions for the last token of `input`.
    ///
    /// Completed tokens are matched against the tree without resolving arguments.
    /// Nodes `executor` may not use are neither walked nor offered.
    ///
    /// # Errors
    ///
    /// Returns [`emmy_error::DispatchErrorKind::Closed`] once the dispatcher is closed.
    #[instrument(skip(self, executor), fields(executor = executor.name()))]
    pub fn suggest(
        &self,
        input: &str,
        executor: &dyn Permissible,
    ) -> Result<Vec<Suggestion>, DispatchError> {
        if self.is_closed() {
            return Err(DispatchError::closed());
        }
        let Some((complete, partial, span)) = split_partial(input) else {
            return Ok(Vec::new());
        };

        let (steps, consumed) = self.walk(&complete, |node| node.can_use(executor));
        if consumed < complete.len() {
            trace!("Completed tokens do not match the grammar");
            return Ok(Vec::new());
        }
        let node = steps.last().map_or(self.tree.root(), |step| step.node);

        let lowered = partial.to_lowercase();
        let mut suggestions: Vec<Suggestion> = Vec::new();
        for child in node.children().iter().filter(|child| child.can_use(executor)) {
            let candidates = match child.kind() {
                NodeKind::Literal if child.name().to_lowercase().starts_with(&lowered) => {
                    vec![child.name().to_string()]
                }
                NodeKind::Argument(argument) if argument.token_count() == 1 => {
                    argument.suggest(&partial)
                }
                _ => Vec::new(),
            };
            for text in candidates {
                if !suggestions.iter().any(|existing| *existing.text() == text) {
                    suggestions.push(Suggestion::new(text, span));
                }
            }
        }
        debug!(count = suggestions.len(), "Produced suggestions");
        Ok(suggestions)
    }

    async fn run(
        &self,
        input: &str,
        executor: Arc<dyn Permissible>,
        cancellation: &CancellationFlag,
    ) -> Result<CommandOutput, DispatchError> {
        let mut state = DispatchState::Start;

        advance(&mut state, DispatchState::Tokenizing, cancellation)?;
        let tokens = tokenize(input)?;

        let (steps, consumed) = self.walk(&tokens, |_| true);
        let path = steps
            .iter()
            .fold(String::new(), |path, step| node_path(&path, step.node));
        advance(&mut state, DispatchState::Matching(path.clone()), cancellation)?;
        let node = steps.last().map_or(self.tree.root(), |step| step.node);

        if let Some(token) = tokens.get(consumed) {
            if !(self.allow_unregistered_arguments && node.is_executable()) {
                let kind = if steps.is_empty() {
                    ParseErrorKind::UnknownCommand(token.text().to_string())
                } else {
                    ParseErrorKind::UnexpectedToken {
                        token: token.text().to_string(),
                        after: path,
                    }
                };
                return Err(ParseError::new(kind).with_span(token.span()).into());
            }
            debug!(
                count = tokens.len() - consumed,
                "Passing unregistered arguments to handler"
            );
        }

        let Some(handler) = node.handler() else {
            let span = tokens.last().map(Token::span).unwrap_or_default();
            let end = TokenSpan::new(span.end, span.end);
            return Err(ParseError::new(ParseErrorKind::IncompleteCommand(path))
                .with_span(end)
                .into());
        };

        advance(&mut state, DispatchState::ArgumentResolution, cancellation)?;
        let mut arguments = Vec::new();
        for step in &steps {
            let NodeKind::Argument(argument) = step.node.kind() else {
                continue;
            };
            let consumed_tokens = &tokens[step.tokens.clone()];
            let value = argument.resolve(step.node.name(), consumed_tokens).await?;
            let span = span_of(consumed_tokens);
            let raw = span
                .slice(input)
                .map(str::to_string)
                .unwrap_or_else(|| text_of(consumed_tokens));
            trace!(argument = step.node.name(), raw = %raw, "Resolved argument");
            arguments.push(ParsedArgument::new(step.node.name().to_string(), span, raw, value));
            if cancellation.is_cancelled() {
                debug!(state = %state, "Dispatch cancelled");
                return Err(DispatchError::cancelled());
            }
        }

        advance(&mut state, DispatchState::PermissionCheck, cancellation)?;
        let mut checked = String::new();
        for step in &steps {
            checked = node_path(&checked, step.node);
            if !step.node.can_use(executor.as_ref()) {
                debug!(node = step.node.name(), path = %checked, "Permission denied");
                return Err(PermissionDeniedError::new(step.node.name(), checked).into());
            }
        }

        advance(&mut state, DispatchState::Execute, cancellation)?;
        let context = DispatchContext::new(
            executor,
            input.to_string(),
            tokens,
            arguments,
            consumed,
            cancellation.clone(),
        );
        let output = handler(&context)?;
        trace!(from = %state, to = %DispatchState::Done, "Dispatch transition");
        Ok(output)
    }

    /// Greedily match tokens against the tree, returning the matched nodes and the
    /// number of tokens they consumed.
    fn walk<'t, F>(&'t self, tokens: &[Token], visible: F) -> (Vec<Step<'t>>, usize)
    where
        F: Fn(&CommandNode) -> bool,
    {
        let mut steps: Vec<Step<'t>> = Vec::new();
        let mut consumed = 0;
        while let Some(token) = tokens.get(consumed) {
            let node = steps.last().map_or(self.tree.root(), |step| step.node);

            let literal = node.children().iter().find(|child| {
                child.kind().is_literal()
                    && !token.is_quoted()
                    && child.name() == token.text()
                    && visible(child)
            });
            let step = match literal {
                Some(child) => Some(Step {
                    node: child,
                    tokens: consumed..consumed + 1,
                }),
                None => node.children().iter().find_map(|child| {
                    let argument = child.kind().argument_type()?;
                    let end = consumed + argument.token_count().max(1);
                    let fits = end <= tokens.len()
                        && visible(child)
                        && argument.validate(&tokens[consumed..end]);
                    fits.then(|| Step {
                        node: child,
                        tokens: consumed..end,
                    })
                }),
            };

            let Some(step) = step else {
                break;
            };
            trace!(node = step.node.name(), "Matched node");
            consumed = step.tokens.end;
            steps.push(step);
        }
        (steps, consumed)
    }
}

/// Move to `next`, unless the dispatch was cancelled.
fn advance(
    state: &mut DispatchState,
    next: DispatchState,
    cancellation: &CancellationFlag,
) -> Result<(), DispatchError> {
    if cancellation.is_cancelled() {
        debug!(state = %state, "Dispatch cancelled");
        return Err(DispatchError::cancelled());
    }
    trace!(from = %state, to = %next, "Dispatch transition");
    *state = next;
    Ok(())
}

/// Split input into completed tokens and the partial token being typed.
///
/// Returns `None` if the completed part cannot be tokenized.
fn split_partial(input: &str) -> Option<(Vec<Token>, String, TokenSpan)> {
    let at_end = TokenSpan::new(input.len(), input.len());
    match tokenize(input) {
        Ok(tokens) if input.ends_with(char::is_whitespace) => Some((tokens, String::new(), at_end)),
        Ok(mut tokens) => {
            let last = tokens.pop()?;
            Some((tokens, last.text().to_string(), last.span()))
        }
        Err(err) => match err.kind {
            ParseErrorKind::EmptyInput => Some((Vec::new(), String::new(), at_end)),
            ParseErrorKind::UnclosedQuote(start) => {
                let complete = match tokenize(input.get(..start)?) {
                    Ok(tokens) => tokens,
                    Err(err) if err.kind == ParseErrorKind::EmptyInput => Vec::new(),
                    Err(_) => return None,
                };
                let partial = input.get(start + 1..)?.to_string();
                Some((complete, partial, TokenSpan::new(start, input.len())))
            }
            _ => None,
        },
    }
}
