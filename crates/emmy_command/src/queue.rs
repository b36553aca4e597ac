//! Serialized dispatch on a background task.

use crate::{CancellationFlag, DispatchOutcome, Dispatcher};
use emmy_core::Permissible;
use emmy_error::DispatchError;
use std::sync::Arc;
use tokio::sync::{Mutex, mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument, warn};

const DEFAULT_CAPACITY: usize = 64;

/// Message types for the dispatch queue.
enum QueueMessage {
    /// Run one dispatch and reply with its outcome
    Dispatch {
        input: String,
        executor: Arc<dyn Permissible>,
        cancellation: CancellationFlag,
        reply: oneshot::Sender<DispatchOutcome>,
    },
    /// Stop after everything queued before this message
    Shutdown,
}

/// Runs dispatches one at a time, in submission order, on a dedicated task.
///
/// For hosts that must not run command handlers concurrently.
///
/// # Example
///
/// ```
/// use emmy_command::{CommandOutput, DispatchQueue, Dispatcher, GrammarTreeBuilder, literal};
/// use emmy_core::{ConsoleSender, CoreSettings};
/// use std::sync::Arc;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let mut builder = GrammarTreeBuilder::new();
/// builder.register(literal("ping").executes(|_| Ok(CommandOutput::success_with("pong")))).unwrap();
/// let dispatcher = Arc::new(Dispatcher::new(Arc::new(builder.freeze()), &CoreSettings::default()));
///
/// let queue = DispatchQueue::spawn(dispatcher);
/// let outcome = queue.submit("ping", Arc::new(ConsoleSender)).await;
/// assert_eq!(outcome.message().as_deref(), Some("pong"));
/// queue.shutdown().await;
/// # }
/// ```
#[derive(Debug)]
pub struct DispatchQueue {
    tx: mpsc::Sender<QueueMessage>,
    handle: Mutex<Option<JoinHandle<()>>>,
}

impl std::fmt::Debug for QueueMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Dispatch { input, .. } => f.debug_struct("Dispatch").field("input", input).finish(),
            Self::Shutdown => f.write_str("Shutdown"),
        }
    }
}

impl DispatchQueue {
    /// Start a queue with the default capacity.
    pub fn spawn(dispatcher: Arc<Dispatcher>) -> Self {
        Self::with_capacity(dispatcher, DEFAULT_CAPACITY)
    }

    /// Start a queue holding at most `capacity` pending dispatches.
    ///
    /// Submitting to a full queue waits for room.
    pub fn with_capacity(dispatcher: Arc<Dispatcher>, capacity: usize) -> Self {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        let handle = tokio::spawn(run(dispatcher, rx));
        Self {
            tx,
            handle: Mutex::new(Some(handle)),
        }
    }

    /// Queue a dispatch, returning a receiver for its outcome.
    ///
    /// # Errors
    ///
    /// Returns [`emmy_error::DispatchErrorKind::Closed`] if the queue has shut down.
    pub async fn enqueue(
        &self,
        input: impl Into<String>,
        executor: Arc<dyn Permissible>,
        cancellation: CancellationFlag,
    ) -> Result<oneshot::Receiver<DispatchOutcome>, DispatchError> {
        let (reply, outcome) = oneshot::channel();
        let message = QueueMessage::Dispatch {
            input: input.into(),
            executor,
            cancellation,
            reply,
        };
        self.tx
            .send(message)
            .await
            .map_err(|_| DispatchError::closed())?;
        Ok(outcome)
    }

    /// Queue a dispatch and wait for its outcome.
    pub async fn submit(
        &self,
        input: impl Into<String>,
        executor: Arc<dyn Permissible>,
    ) -> DispatchOutcome {
        match self.enqueue(input, executor, CancellationFlag::new()).await {
            Ok(outcome) => outcome
                .await
                .unwrap_or_else(|_| DispatchOutcome::Failed(DispatchError::closed())),
            Err(err) => DispatchOutcome::Failed(err),
        }
    }

    /// Finish everything already queued, then stop the task.
    ///
    /// Later submissions fail with [`emmy_error::DispatchErrorKind::Closed`].
    #[instrument(skip(self))]
    pub async fn shutdown(&self) {
        if self.tx.send(QueueMessage::Shutdown).await.is_err() {
            debug!("Dispatch queue already stopped");
        }
        if let Some(handle) = self.handle.lock().await.take()
            && let Err(e) = handle.await
        {
            warn!(error = ?e, "Dispatch queue task failed");
        }
    }
}

#[instrument(skip_all)]
async fn run(dispatcher: Arc<Dispatcher>, mut rx: mpsc::Receiver<QueueMessage>) {
    info!("Dispatch queue started");

    while let Some(message) = rx.recv().await {
        match message {
            QueueMessage::Dispatch {
                input,
                executor,
                cancellation,
                reply,
            } => {
                let outcome = dispatcher.dispatch(&input, executor, &cancellation).await;
                if reply.send(outcome).is_err() {
                    debug!("Submitter dropped before the outcome was ready");
                }
            }
            QueueMessage::Shutdown => {
                info!("Dispatch queue shutting down");
                break;
            }
        }
    }
    rx.close();
}
