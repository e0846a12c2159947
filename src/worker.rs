use std::fmt;
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;

use tokio::sync::oneshot;
use tracing::debug;

use crate::backend::StatementBackend;
use crate::connector::Connector;
use crate::error::ConnectorError;
use crate::outcome::{ExecutionOutcome, Stage};
use crate::statement::Statement;
use crate::types::ParameterSet;

#[cfg(feature = "sqlite")]
use crate::sqlite::{SqliteBackend, SqliteOptions};

/// Async handle to a [`Connector`] owned by a dedicated worker thread.
///
/// Commands are processed one at a time in submission order, so the worker is
/// the serialization boundary for its connection. Clones share the same worker;
/// the thread exits once the last clone is dropped.
#[derive(Clone)]
pub struct AsyncConnector {
    worker: Arc<Worker>,
}

impl AsyncConnector {
    /// Move `connector` onto a new worker thread.
    ///
    /// # Errors
    /// Returns `ConnectorError::ConnectionError` if the thread cannot be spawned.
    pub fn spawn<B>(connector: Connector<B>) -> Result<Self, ConnectorError>
    where
        B: StatementBackend + Send + 'static,
    {
        Ok(Self {
            worker: Arc::new(Worker::spawn(connector)?),
        })
    }

    /// Open a `SQLite` connection on a blocking thread and hand it to a worker.
    ///
    /// # Errors
    /// Returns `ConnectorError` if opening the database or spawning the worker fails.
    #[cfg(feature = "sqlite")]
    pub async fn open(opts: SqliteOptions) -> Result<Self, ConnectorError> {
        let backend = tokio::task::spawn_blocking(move || SqliteBackend::open(&opts))
            .await
            .map_err(|e| {
                ConnectorError::ConnectionError(format!("sqlite spawn_blocking join error: {e}"))
            })??;
        Self::spawn(Connector::new(backend))
    }

    pub async fn execute(&self, statement: &Statement) -> ExecutionOutcome {
        self.worker
            .request(|respond_to| Command::Execute {
                statement: statement.clone(),
                params: None,
                respond_to,
            })
            .await
    }

    pub async fn execute_with(
        &self,
        statement: &Statement,
        params: &ParameterSet,
    ) -> ExecutionOutcome {
        self.worker
            .request(|respond_to| Command::Execute {
                statement: statement.clone(),
                params: Some(params.clone()),
                respond_to,
            })
            .await
    }

    pub async fn execute_batch(
        &self,
        statement: &Statement,
        batch: &[ParameterSet],
    ) -> ExecutionOutcome {
        self.worker
            .request(|respond_to| Command::Batch {
                statement: statement.clone(),
                batch: batch.to_vec(),
                respond_to,
            })
            .await
    }

    pub async fn execute_raw(&self, sql: &str) -> ExecutionOutcome {
        self.execute(&Statement::parse(sql)).await
    }

    pub async fn execute_raw_with(&self, sql: &str, params: &ParameterSet) -> ExecutionOutcome {
        self.execute_with(&Statement::parse(sql), params).await
    }

    pub async fn execute_raw_batch(&self, sql: &str, batch: &[ParameterSet]) -> ExecutionOutcome {
        self.execute_batch(&Statement::parse(sql), batch).await
    }

    /// # Errors
    /// Returns `ConnectorError` if the script fails or the worker is gone.
    pub async fn execute_script(&self, sql: &str) -> Result<(), ConnectorError> {
        let (tx, rx) = oneshot::channel();
        self.worker.send_command(Command::Script {
            sql: sql.to_owned(),
            respond_to: tx,
        })?;
        rx.await.map_err(|_| {
            ConnectorError::ConnectionError("worker dropped while executing script".into())
        })?
    }

    /// SQL text of `statement` for diagnostics; does not reach the worker.
    #[must_use]
    pub fn describe(&self, statement: &Statement) -> String {
        statement.describe()
    }
}

impl fmt::Debug for AsyncConnector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AsyncConnector")
            .field("worker", &self.worker.name)
            .finish()
    }
}

struct Worker {
    sender: Sender<Command>,
    name: String,
}

impl Worker {
    fn spawn<B>(mut connector: Connector<B>) -> Result<Self, ConnectorError>
    where
        B: StatementBackend + Send + 'static,
    {
        let (sender, receiver) = mpsc::channel::<Command>();
        let name = format!("connector-worker-{}", next_worker_id());
        thread::Builder::new()
            .name(name.clone())
            .spawn(move || run_worker(&mut connector, &receiver))
            .map_err(|err| {
                ConnectorError::ConnectionError(format!("failed to spawn worker thread: {err}"))
            })?;
        Ok(Self { sender, name })
    }

    fn send_command(&self, command: Command) -> Result<(), ConnectorError> {
        self.sender
            .send(command)
            .map_err(|_| ConnectorError::ConnectionError("worker closed".into()))
    }

    async fn request(
        &self,
        build: impl FnOnce(oneshot::Sender<ExecutionOutcome>) -> Command,
    ) -> ExecutionOutcome {
        let (tx, rx) = oneshot::channel();
        if let Err(error) = self.send_command(build(tx)) {
            return ExecutionOutcome::Failed {
                stage: Stage::Built,
                error,
            };
        }
        rx.await.unwrap_or_else(|_| ExecutionOutcome::Failed {
            stage: Stage::Built,
            error: ConnectorError::ConnectionError("worker dropped while executing".into()),
        })
    }
}

impl Drop for Worker {
    fn drop(&mut self) {
        let _ = self.sender.send(Command::Shutdown);
    }
}

fn next_worker_id() -> u64 {
    use std::sync::atomic::{AtomicU64, Ordering};
    static NEXT: AtomicU64 = AtomicU64::new(0);
    NEXT.fetch_add(1, Ordering::Relaxed)
}

enum Command {
    Execute {
        statement: Statement,
        params: Option<ParameterSet>,
        respond_to: oneshot::Sender<ExecutionOutcome>,
    },
    Batch {
        statement: Statement,
        batch: Vec<ParameterSet>,
        respond_to: oneshot::Sender<ExecutionOutcome>,
    },
    Script {
        sql: String,
        respond_to: oneshot::Sender<Result<(), ConnectorError>>,
    },
    Shutdown,
}

fn run_worker<B: StatementBackend>(connector: &mut Connector<B>, receiver: &Receiver<Command>) {
    while let Ok(command) = receiver.recv() {
        match command {
            Command::Execute {
                statement,
                params,
                respond_to,
            } => {
                let outcome = match &params {
                    Some(set) => connector.execute_with(&statement, set),
                    None => connector.execute(&statement),
                };
                let _ = respond_to.send(outcome);
            }
            Command::Batch {
                statement,
                batch,
                respond_to,
            } => {
                let _ = respond_to.send(connector.execute_batch(&statement, &batch));
            }
            Command::Script { sql, respond_to } => {
                let _ = respond_to.send(connector.execute_script(&sql));
            }
            Command::Shutdown => break,
        }
    }
    debug!("connector worker exiting");
}
