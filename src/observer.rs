//! Status notifications for session lifecycle steps.
//!
//! The fetcher never writes to a console; each successful step is reported
//! through an injectable observer so callers (and tests) decide where the
//! messages go.

use serde::Serialize;

/// A lifecycle step the fetcher has completed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum StatusEvent {
    /// TCP connection established.
    Connected { host: String, port: u16 },
    /// SSH protocol negotiation finished.
    HandshakeComplete,
    /// Password accepted by the server.
    Authenticated { username: String },
    /// A download finished; `bytes` is the full file size.
    DownloadComplete { path: String, bytes: u64 },
    /// Session torn down.
    Disconnected,
}

/// Receiver for [`StatusEvent`]s.
pub trait StatusObserver: Send + Sync {
    fn on_status(&self, event: StatusEvent);
}

/// Default observer: routes events through `tracing` at info level.
#[derive(Debug, Default)]
pub struct TracingObserver;

impl StatusObserver for TracingObserver {
    fn on_status(&self, event: StatusEvent) {
        match event {
            StatusEvent::Connected { host, port } => {
                tracing::info!(%host, port, "Connected");
            }
            StatusEvent::HandshakeComplete => {
                tracing::info!("SSH handshake complete");
            }
            StatusEvent::Authenticated { username } => {
                tracing::info!(%username, "Authenticated");
            }
            StatusEvent::DownloadComplete { path, bytes } => {
                tracing::info!(%path, bytes, "Download complete");
            }
            StatusEvent::Disconnected => {
                tracing::info!("Disconnected");
            }
        }
    }
}

/// Observer that drops every event.
#[derive(Debug, Default)]
pub struct NoopObserver;

impl StatusObserver for NoopObserver {
    fn on_status(&self, _event: StatusEvent) {}
}
