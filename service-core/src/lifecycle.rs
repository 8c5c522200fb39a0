//! Process lifecycle: signal handling and graceful shutdown.
//!
//! On the first termination signal the server stops accepting connections and
//! drains the ones in flight. A SIGTERM drain is bounded by a timeout; a SIGINT
//! drain waits for as long as it takes, unless a SIGTERM follows it.

use std::fmt;
use std::io;
use std::net::SocketAddr;
use std::pin::Pin;
use std::time::Duration;

use axum::Router;
use futures::stream::{self, Stream, StreamExt};
use tokio::net::TcpListener;
use tokio::signal;
use tokio::sync::oneshot;
use tokio::time::Sleep;

pub const DEFAULT_DRAIN_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownSignal {
    /// SIGTERM, as sent by orchestrators.
    Terminate,
    /// SIGINT / Ctrl+C.
    Interrupt,
}

impl ShutdownSignal {
    /// How long the drain may take before the process is forced down.
    pub fn drain_deadline(self, drain_timeout: Duration) -> Option<Duration> {
        match self {
            ShutdownSignal::Terminate => Some(drain_timeout),
            ShutdownSignal::Interrupt => None,
        }
    }
}

impl fmt::Display for ShutdownSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShutdownSignal::Terminate => write!(f, "SIGTERM"),
            ShutdownSignal::Interrupt => write!(f, "SIGINT"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownOutcome {
    /// Every in-flight connection finished.
    Drained(ShutdownSignal),
    /// The drain deadline passed with connections still open.
    TimedOut(ShutdownSignal),
}

impl ShutdownOutcome {
    pub fn exit_code(self) -> i32 {
        match self {
            ShutdownOutcome::Drained(_) => 0,
            ShutdownOutcome::TimedOut(_) => 1,
        }
    }
}

/// Boxed stream of termination signals, in delivery order.
pub type SignalStream = Pin<Box<dyn Stream<Item = ShutdownSignal> + Send>>;

/// Every SIGTERM and SIGINT delivered to the process from now on. Installing
/// the handlers replaces the default terminate-on-signal behaviour.
pub fn shutdown_signals() -> io::Result<SignalStream> {
    #[cfg(unix)]
    {
        use signal::unix::{SignalKind, signal};

        let terminate = signal(SignalKind::terminate())?;
        let interrupt = signal(SignalKind::interrupt())?;

        let stream = stream::unfold(
            (terminate, interrupt),
            |(mut terminate, mut interrupt)| async move {
                let received = tokio::select! {
                    Some(()) = terminate.recv() => ShutdownSignal::Terminate,
                    Some(()) = interrupt.recv() => ShutdownSignal::Interrupt,
                    else => return None,
                };
                Some((received, (terminate, interrupt)))
            },
        );
        Ok(Box::pin(stream))
    }

    #[cfg(not(unix))]
    {
        let stream = stream::unfold((), |()| async {
            signal::ctrl_c().await.ok()?;
            Some((ShutdownSignal::Interrupt, ()))
        });
        Ok(Box::pin(stream))
    }
}

/// Serve `router` on `listener` until the first item of `signals`, then drain.
///
/// A SIGTERM drain is cut off after `drain_timeout`. A SIGINT drain has no
/// deadline of its own, but a SIGTERM arriving while it runs bounds the rest
/// of it by `drain_timeout`.
pub async fn serve_until_signal<S>(
    listener: TcpListener,
    router: Router,
    signals: S,
    drain_timeout: Duration,
) -> io::Result<ShutdownOutcome>
where
    S: Stream<Item = ShutdownSignal> + Send + Unpin,
{
    let mut signals = signals.fuse();
    let (drain_tx, drain_rx) = oneshot::channel::<()>();

    let server = axum::serve(
        listener,
        router.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(async move {
        drain_rx.await.ok();
    });

    let mut server = tokio::spawn(async move { server.await });

    let received = tokio::select! {
        res = &mut server => {
            flatten(res)?;
            return Err(io::Error::other("server stopped before a shutdown signal"));
        }
        Some(received) = signals.next() => received,
    };

    tracing::info!(signal = %received, "{} received, shutting down gracefully", received);
    let _ = drain_tx.send(());

    let mut bounded_by = received;
    let mut deadline = received.drain_deadline(drain_timeout).map(drain_timer);

    loop {
        tokio::select! {
            res = &mut server => {
                flatten(res)?;
                return Ok(ShutdownOutcome::Drained(received));
            }
            _ = expired(&mut deadline) => {
                server.abort();
                tracing::error!(
                    signal = %bounded_by,
                    timeout_secs = drain_timeout.as_secs_f64(),
                    "Forced shutdown after timeout"
                );
                return Ok(ShutdownOutcome::TimedOut(bounded_by));
            }
            Some(next) = signals.next(), if deadline.is_none() => {
                if let Some(limit) = next.drain_deadline(drain_timeout) {
                    tracing::info!(signal = %next, "{} received during drain, forcing exit in {:?}", next, limit);
                    bounded_by = next;
                    deadline = Some(drain_timer(limit));
                }
            }
        }
    }
}

fn drain_timer(limit: Duration) -> Pin<Box<Sleep>> {
    Box::pin(tokio::time::sleep(limit))
}

/// Resolves when the armed deadline passes; never resolves while unarmed.
async fn expired(deadline: &mut Option<Pin<Box<Sleep>>>) {
    match deadline {
        Some(timer) => timer.as_mut().await,
        None => std::future::pending().await,
    }
}

fn flatten(res: Result<io::Result<()>, tokio::task::JoinError>) -> io::Result<()> {
    res.map_err(|e| io::Error::other(format!("server task failed: {}", e)))?
}
