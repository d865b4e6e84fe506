// Server module
// Accept loop, listener creation, connection handling and shutdown signals

pub mod connection;
pub mod listener;
pub mod signal;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::Notify;

pub use listener::create_listener;
pub use signal::start_signal_handler;

use crate::config::AppState;
use crate::error::Result;
use crate::logger;
use connection::accept_connection;

/// Poll interval while waiting for in-flight connections at shutdown
const DRAIN_POLL: Duration = Duration::from_millis(50);

/// Accept connections until `shutdown` is notified.
///
/// Each accepted connection is served on its own task. After shutdown the
/// listener is closed immediately and in-flight connections get up to
/// `max(read_timeout, write_timeout)` to finish.
pub async fn run(listener: TcpListener, state: Arc<AppState>, shutdown: Arc<Notify>) -> Result<()> {
    let active_connections = Arc::new(AtomicUsize::new(0));
    logger::log_debug(&format!("Accept loop running on {}", listener.local_addr()?));

    let notified = shutdown.notified();
    tokio::pin!(notified);

    loop {
        tokio::select! {
            accept_result = listener.accept() => {
                match accept_result {
                    Ok((stream, peer_addr)) => {
                        accept_connection(stream, peer_addr, &state, &active_connections);
                    }
                    Err(e) => {
                        logger::log_error(&format!("Failed to accept connection: {e}"));
                    }
                }
            }

            () = &mut notified => break,
        }
    }

    drop(listener);
    logger::log_shutdown(active_connections.load(Ordering::SeqCst));

    let grace = Duration::from_secs(std::cmp::max(
        state.config.performance.read_timeout,
        state.config.performance.write_timeout,
    ));
    let drained = tokio::time::timeout(grace, async {
        while active_connections.load(Ordering::SeqCst) > 0 {
            tokio::time::sleep(DRAIN_POLL).await;
        }
    })
    .await;

    if drained.is_err() {
        logger::log_warning(&format!(
            "{} connection(s) still open after {} seconds; exiting anyway",
            active_connections.load(Ordering::SeqCst),
            grace.as_secs()
        ));
    }

    Ok(())
}
