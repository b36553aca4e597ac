//! Line-oriented console platform.

use emmy_command::{DispatchOutcome, Dispatcher, PlatformAdapter, render_plain};
use emmy_core::{ConsoleSender, Permissible};
use std::fmt;
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, instrument};

/// Platform adapter that reads one command per line and writes rendered results.
///
/// A leading `/` is stripped, as typed in chat. Blank lines are skipped.
///
/// # Examples
///
/// ```
/// use emmy::{
///     CommandOutput, ConsolePlatformAdapter, CoreSettings, Dispatcher, GrammarTreeBuilder,
///     literal,
/// };
/// use std::sync::Arc;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> std::io::Result<()> {
/// let mut builder = GrammarTreeBuilder::new();
/// builder.register(literal("ping").executes(|_| Ok(CommandOutput::success_with("pong")))).unwrap();
/// let dispatcher = Dispatcher::new(Arc::new(builder.freeze()), &CoreSettings::default());
///
/// let console = ConsolePlatformAdapter::new(Arc::new(dispatcher));
/// let mut output = Vec::new();
/// console.run(&b"/ping\n\nping\n"[..], &mut output).await?;
/// assert_eq!(String::from_utf8_lossy(&output), "pong\npong\n");
/// # Ok(())
/// # }
/// ```
pub struct ConsolePlatformAdapter {
    dispatcher: Arc<Dispatcher>,
    executor: Arc<dyn Permissible>,
}

impl ConsolePlatformAdapter {
    /// Adapter that runs every line as the server console.
    pub fn new(dispatcher: Arc<Dispatcher>) -> Self {
        Self {
            dispatcher,
            executor: Arc::new(ConsoleSender),
        }
    }

    /// Run lines as `executor` instead of the console.
    pub fn with_executor(mut self, executor: Arc<dyn Permissible>) -> Self {
        self.executor = executor;
        self
    }

    /// Sender every line runs as.
    pub fn executor(&self) -> &Arc<dyn Permissible> {
        &self.executor
    }

    /// Dispatch lines from `reader` until it is exhausted, writing each non-empty
    /// result to `writer`.
    ///
    /// Returns the number of commands dispatched.
    ///
    /// # Errors
    ///
    /// Returns error if reading or writing fails. Dispatch failures are rendered, not
    /// returned.
    #[instrument(skip_all, fields(executor = self.executor.name()))]
    pub async fn run<R, W>(&self, reader: R, mut writer: W) -> std::io::Result<usize>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut lines = reader.lines();
        let mut dispatched = 0;
        while let Some(line) = lines.next_line().await? {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let input = line.strip_prefix('/').unwrap_or(line);

            let outcome = self.submit(input, self.executor.clone()).await;
            dispatched += 1;
            debug!(kind = %outcome.result_kind(), "Console command finished");

            let rendered = self.render_result(&outcome);
            if !rendered.is_empty() {
                writer.write_all(rendered.as_bytes()).await?;
                writer.write_all(b"\n").await?;
            }
        }
        writer.flush().await?;
        Ok(dispatched)
    }
}

impl PlatformAdapter for ConsolePlatformAdapter {
    type Output = String;

    fn platform(&self) -> &str {
        "console"
    }

    fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    fn render_result(&self, outcome: &DispatchOutcome) -> String {
        render_plain(outcome)
    }
}

impl fmt::Debug for ConsolePlatformAdapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConsolePlatformAdapter")
            .field("executor", &self.executor.name())
            .field("dispatcher", &self.dispatcher)
            .finish()
    }
}
