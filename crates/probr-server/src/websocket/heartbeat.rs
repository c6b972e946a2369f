//! Heartbeat liveness monitoring.

use std::sync::Arc;
use std::time::Duration;

use tokio::time;
use tokio_util::sync::CancellationToken;

use super::connection::ClientConnection;

/// Outcome of the heartbeat loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeartbeatResult {
    /// No heartbeat arrived within the interval.
    TimedOut,
    /// The heartbeat was cancelled externally.
    Cancelled,
}

/// Watch a connection's heartbeat deadline.
///
/// Sleeps until `last_heartbeat + interval`. On wake the timestamp is read
/// again: if a heartbeat moved it, sleep until the new deadline, otherwise
/// report `TimedOut`.
pub async fn run_heartbeat(
    connection: Arc<ClientConnection>,
    interval: Duration,
    cancel: CancellationToken,
) -> HeartbeatResult {
    loop {
        let deadline = connection.last_heartbeat() + interval;
        if time::Instant::now() >= deadline {
            return HeartbeatResult::TimedOut;
        }
        tokio::select! {
            () = time::sleep_until(deadline) => {}
            () = cancel.cancelled() => return HeartbeatResult::Cancelled,
        }
    }
}
