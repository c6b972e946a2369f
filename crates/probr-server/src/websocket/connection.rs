//! WebSocket client connection state.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::mpsc;
use tokio::time::Instant;

/// An item queued for the connection's writer task.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outbound {
    /// A serialized text frame.
    Frame(Arc<String>),
    /// Send a close frame and stop writing.
    Close {
        /// WebSocket close code.
        code: u16,
        /// Close reason.
        reason: &'static str,
    },
}

/// Represents a connected WebSocket client.
pub struct ClientConnection {
    /// Send channel to the client's WebSocket write task.
    tx: mpsc::Sender<Outbound>,
    /// When this connection was established.
    pub connected_at: Instant,
    /// When the last op 1 arrived (or the connection was established).
    last_heartbeat: Mutex<Instant>,
}

impl ClientConnection {
    /// Create a new connection.
    pub fn new(tx: mpsc::Sender<Outbound>) -> Self {
        let now = Instant::now();
        Self {
            tx,
            connected_at: now,
            last_heartbeat: Mutex::new(now),
        }
    }

    /// Queue an item for the writer.
    ///
    /// Returns `false` if the channel is full or closed.
    pub fn send(&self, item: Outbound) -> bool {
        self.tx.try_send(item).is_ok()
    }

    /// Queue a text frame.
    pub fn send_text(&self, text: String) -> bool {
        self.send(Outbound::Frame(Arc::new(text)))
    }

    /// Queue a text frame, waiting for queue space.
    ///
    /// Returns `false` once the writer has gone away.
    pub async fn deliver(&self, text: String) -> bool {
        self.tx.send(Outbound::Frame(Arc::new(text))).await.is_ok()
    }

    /// Queue a close frame behind any pending frames. Waits for queue space,
    /// so callers bound it with a timeout.
    pub async fn close(&self, code: u16, reason: &'static str) -> bool {
        self.tx.send(Outbound::Close { code, reason }).await.is_ok()
    }

    /// Record a heartbeat; moves the liveness deadline forward.
    pub fn record_heartbeat(&self) {
        *self.last_heartbeat.lock() = Instant::now();
    }

    /// When the last heartbeat was recorded.
    pub fn last_heartbeat(&self) -> Instant {
        *self.last_heartbeat.lock()
    }

    /// Connection age.
    pub fn age(&self) -> Duration {
        self.connected_at.elapsed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_connection() -> (ClientConnection, mpsc::Receiver<Outbound>) {
        let (tx, rx) = mpsc::channel(32);
        let conn = ClientConnection::new(tx);
        (conn, rx)
    }

    #[test]
    fn create_connection() {
        let (conn, _rx) = make_connection();
        assert_eq!(conn.last_heartbeat(), conn.connected_at);
    }

    #[tokio::test]
    async fn send_text_success() {
        let (conn, mut rx) = make_connection();
        assert!(conn.send_text("hello".into()));
        let msg = rx.recv().await.unwrap();
        assert_eq!(msg, Outbound::Frame(Arc::new("hello".into())));
    }

    #[tokio::test]
    async fn send_to_closed_channel_returns_false() {
        let (tx, rx) = mpsc::channel(32);
        let conn = ClientConnection::new(tx);
        drop(rx);
        assert!(!conn.send_text("hello".into()));
        assert!(!conn.deliver("hello".into()).await);
        assert!(!conn.close(4009, "Session timed out").await);
    }

    #[tokio::test]
    async fn send_to_full_channel_returns_false() {
        let (tx, _rx) = mpsc::channel(1);
        let conn = ClientConnection::new(tx);
        assert!(conn.send_text("msg1".into()));
        assert!(!conn.send_text("msg2".into()));
    }

    #[tokio::test]
    async fn deliver_waits_for_space() {
        let (tx, mut rx) = mpsc::channel(1);
        let conn = Arc::new(ClientConnection::new(tx));
        assert!(conn.send_text("first".into()));

        let pending = tokio::spawn({
            let conn = conn.clone();
            async move { conn.deliver("second".into()).await }
        });
        tokio::task::yield_now().await;
        assert!(!pending.is_finished());

        assert_eq!(rx.recv().await, Some(Outbound::Frame(Arc::new("first".into()))));
        assert!(pending.await.unwrap());
        assert_eq!(rx.recv().await, Some(Outbound::Frame(Arc::new("second".into()))));
    }

    #[tokio::test(start_paused = true)]
    async fn close_on_full_queue_needs_a_timeout() {
        let (tx, _rx) = mpsc::channel(1);
        let conn = ClientConnection::new(tx);
        assert!(conn.send_text("stuck".into()));
        let queued = tokio::time::timeout(
            Duration::from_secs(2),
            conn.close(4009, "Session timed out"),
        )
        .await;
        assert!(queued.is_err());
    }

    #[tokio::test]
    async fn close_queued_after_frames() {
        let (conn, mut rx) = make_connection();
        assert!(conn.send_text("last".into()));
        assert!(conn.close(1001, "Server shutting down").await);
        assert!(matches!(rx.recv().await, Some(Outbound::Frame(_))));
        assert_eq!(
            rx.recv().await,
            Some(Outbound::Close {
                code: 1001,
                reason: "Server shutting down"
            })
        );
    }

    #[tokio::test(start_paused = true)]
    async fn record_heartbeat_moves_timestamp() {
        let (conn, _rx) = make_connection();
        let before = conn.last_heartbeat();
        tokio::time::advance(Duration::from_secs(3)).await;
        conn.record_heartbeat();
        assert_eq!(conn.last_heartbeat() - before, Duration::from_secs(3));
        assert_eq!(conn.age(), Duration::from_secs(3));
    }
}
