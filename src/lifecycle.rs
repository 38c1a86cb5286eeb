//! Process lifecycle: bring the transport up, serve, and close it once.
//!
//! Termination signals arrive on a caller-supplied channel so the shutdown
//! path can be driven without real OS signals. [`os_signals`] wires the real
//! ones.

use std::fmt;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio::sync::mpsc;
use tracing::{debug, error, info};

use crate::server::{McpServer, ServerError};

/// Signals that trigger a graceful shutdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminationSignal {
    Interrupt,
    Terminate,
    User1,
    User2,
}

impl fmt::Display for TerminationSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Interrupt => "SIGINT",
            Self::Terminate => "SIGTERM",
            Self::User1 => "SIGUSR1",
            Self::User2 => "SIGUSR2",
        };
        f.write_str(name)
    }
}

/// Why serving stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shutdown {
    EndOfInput,
    Signal(TerminationSignal),
}

#[derive(Debug, thiserror::Error)]
pub enum LifecycleError {
    #[error("transport already started")]
    AlreadyStarted,
    #[error("transport not started")]
    NotStarted,
    #[error(transparent)]
    Server(#[from] ServerError),
    #[error("failed to close transport: {0}")]
    Close(#[source] std::io::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Idle,
    Running,
    Stopped,
}

struct Connection<R, W> {
    reader: R,
    writer: W,
}

/// Owns the server and its transport halves for the life of the process.
pub struct Lifecycle<R, W> {
    server: McpServer,
    connection: Option<Connection<R, W>>,
    state: State,
}

impl<R, W> Lifecycle<R, W>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    pub fn new(server: McpServer) -> Self {
        Self {
            server,
            connection: None,
            state: State::Idle,
        }
    }

    /// Attach the transport. Only valid once.
    pub fn start(&mut self, reader: R, writer: W) -> Result<(), LifecycleError> {
        if self.state != State::Idle {
            return Err(LifecycleError::AlreadyStarted);
        }
        self.connection = Some(Connection { reader, writer });
        self.state = State::Running;
        info!("transport connected");
        Ok(())
    }

    /// Serve until end of input or the first termination signal, then close
    /// the transport. Signals queued after the first are left on the channel.
    ///
    /// Signals are only observed while waiting for the next request; a
    /// request already read is answered before shutdown begins.
    pub async fn run(
        &mut self,
        signals: &mut mpsc::Receiver<TerminationSignal>,
    ) -> Result<Shutdown, LifecycleError> {
        let outcome = self.serve_until_signal(signals).await;
        if matches!(outcome, Err(LifecycleError::NotStarted)) {
            return outcome;
        }

        match &outcome {
            Ok(Shutdown::Signal(signal)) => info!(%signal, "Shutting down server..."),
            Ok(Shutdown::EndOfInput) => info!("input closed, shutting down server..."),
            Err(e) => error!(error = %e, "transport failed, shutting down server..."),
        }

        let closed = self.stop().await;
        let shutdown = outcome?;
        closed?;
        Ok(shutdown)
    }

    async fn serve_until_signal(
        &mut self,
        signals: &mut mpsc::Receiver<TerminationSignal>,
    ) -> Result<Shutdown, LifecycleError> {
        let Some(conn) = self.connection.as_mut() else {
            return Err(LifecycleError::NotStarted);
        };
        let mut raw = Vec::new();

        loop {
            raw.clear();
            // Dropping a pending read on a signal loses at most a partial line.
            let n = tokio::select! {
                read = conn.reader.read_until(b'\n', &mut raw) => read.map_err(ServerError::from)?,
                Some(signal) = signals.recv() => return Ok(Shutdown::Signal(signal)),
            };
            if n == 0 {
                return Ok(Shutdown::EndOfInput);
            }
            self.server.handle_message(&raw, &mut conn.writer).await?;
        }
    }

    /// Flush and close the transport. Returns `false` when there was nothing
    /// left to close, so a second call never reaches the writer.
    pub async fn stop(&mut self) -> Result<bool, LifecycleError> {
        let Some(mut conn) = self.connection.take() else {
            debug!("stop requested with no open transport");
            return Ok(false);
        };
        self.state = State::Stopped;
        conn.writer.flush().await.map_err(LifecycleError::Close)?;
        conn.writer.shutdown().await.map_err(LifecycleError::Close)?;
        info!("transport closed");
        Ok(true)
    }

    pub fn is_running(&self) -> bool {
        self.state == State::Running
    }

    pub fn server(&self) -> &McpServer {
        &self.server
    }
}

/// Forward SIGINT, SIGTERM, SIGUSR1 and SIGUSR2 into a channel.
/// On non-unix targets only ctrl-c is observed.
pub fn os_signals() -> std::io::Result<mpsc::Receiver<TerminationSignal>> {
    let (tx, rx) = mpsc::channel(4);

    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        let kinds = [
            (SignalKind::interrupt(), TerminationSignal::Interrupt),
            (SignalKind::terminate(), TerminationSignal::Terminate),
            (SignalKind::user_defined1(), TerminationSignal::User1),
            (SignalKind::user_defined2(), TerminationSignal::User2),
        ];
        for (kind, name) in kinds {
            let mut stream = signal(kind)?;
            let tx = tx.clone();
            tokio::spawn(async move {
                while stream.recv().await.is_some() {
                    if tx.send(name).await.is_err() {
                        break;
                    }
                }
            });
        }
    }

    #[cfg(not(unix))]
    {
        let tx = tx.clone();
        tokio::spawn(async move {
            while tokio::signal::ctrl_c().await.is_ok() {
                if tx.send(TerminationSignal::Interrupt).await.is_err() {
                    break;
                }
            }
        });
    }

    Ok(rx)
}
