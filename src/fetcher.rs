//! Session lifecycle and the download loop.

use std::io::Read;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::config::{ClientConfig, FetchOptions};
use crate::error::{ConnectError, ConnectResult, DownloadError, DownloadResult};
use crate::observer::{StatusEvent, StatusObserver, TracingObserver};
use crate::transport::{Ssh2Transport, SshSession, Transport};

/// Connection lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConnectionState {
    Disconnected,
    Connected,
}

/// Downloads a single remote file over one SSH session.
///
/// The whole lifecycle is synchronous and blocking: `connect`, then any
/// number of `download_file` calls, then `disconnect`. Dropping a
/// connected fetcher tears the session down.
///
/// ```no_run
/// use sftp_fetch::{ClientConfig, RemoteFileFetcher};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let config = ClientConfig::new("192.168.1.100", 22, "admin", "password")?;
/// let mut fetcher = RemoteFileFetcher::new(config);
/// fetcher.connect()?;
/// let bytes = fetcher.download_file("/var/log/boot.log")?;
/// fetcher.disconnect();
/// # let _ = bytes;
/// # Ok(())
/// # }
/// ```
pub struct RemoteFileFetcher<T: Transport = Ssh2Transport> {
    config: ClientConfig,
    options: FetchOptions,
    transport: T,
    observer: Arc<dyn StatusObserver>,
    session: Option<T::Session>,
    state: ConnectionState,
}

impl RemoteFileFetcher<Ssh2Transport> {
    pub fn new(config: ClientConfig) -> Self {
        Self::with_options(config, FetchOptions::default())
    }

    pub fn with_options(config: ClientConfig, options: FetchOptions) -> Self {
        Self::with_transport(config, options, Ssh2Transport)
    }
}

impl<T: Transport> RemoteFileFetcher<T> {
    /// Builds a fetcher over a custom transport. Used by tests; production
    /// callers go through [`RemoteFileFetcher::new`].
    pub fn with_transport(config: ClientConfig, options: FetchOptions, transport: T) -> Self {
        Self {
            config,
            options,
            transport,
            observer: Arc::new(TracingObserver),
            session: None,
            state: ConnectionState::Disconnected,
        }
    }

    /// Replaces the status observer. Takes effect for subsequent operations.
    pub fn set_observer(&mut self, observer: Arc<dyn StatusObserver>) {
        self.observer = observer;
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn is_connected(&self) -> bool {
        self.state == ConnectionState::Connected
    }

    /// Establishes the session: TCP connect, SSH handshake, password
    /// authentication. Valid only while disconnected.
    pub fn connect(&mut self) -> ConnectResult<()> {
        if self.state == ConnectionState::Connected {
            return Err(ConnectError::AlreadyConnected);
        }

        let session = self
            .transport
            .establish(&self.config, &self.options, self.observer.as_ref())?;

        self.session = Some(session);
        self.state = ConnectionState::Connected;
        Ok(())
    }

    /// Downloads `remote_path` into memory over a fresh SFTP subchannel.
    ///
    /// The subchannel is opened and closed within this call. A failure
    /// leaves the session connected; use [`Self::session_alive`] to check
    /// whether it is still usable.
    pub fn download_file(&mut self, remote_path: &str) -> DownloadResult<Vec<u8>> {
        let session = self.session.as_mut().ok_or(DownloadError::NotConnected)?;
        if remote_path.is_empty() {
            return Err(DownloadError::InvalidPath);
        }

        tracing::debug!(path = %remote_path, "Starting download");

        let mut file = match session.open_remote(remote_path) {
            Ok(file) => file,
            // A refused subchannel often means the session itself died;
            // probing lets callers tell the two apart.
            Err(DownloadError::SftpInitFailed(reason)) => {
                if session.is_alive() {
                    return Err(DownloadError::SftpInitFailed(reason));
                }
                return Err(DownloadError::SessionDead);
            }
            Err(e) => return Err(e),
        };

        let mut chunk = vec![0u8; self.options.chunk_size];
        let mut contents: Vec<u8> = Vec::new();

        loop {
            match file.read(&mut chunk) {
                Ok(0) => break,
                Ok(n) => {
                    if let Some(limit) = self.options.max_size {
                        if contents.len() as u64 + n as u64 > limit {
                            return Err(DownloadError::FileTooLarge { limit });
                        }
                    }
                    contents.extend_from_slice(&chunk[..n]);
                }
                Err(ref e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
                Err(e) => {
                    // Partial data is discarded; the count survives for
                    // diagnostics.
                    return Err(DownloadError::Read {
                        bytes_read: contents.len() as u64,
                        reason: e.to_string(),
                    });
                }
            }
        }

        self.observer.on_status(StatusEvent::DownloadComplete {
            path: remote_path.to_string(),
            bytes: contents.len() as u64,
        });

        Ok(contents)
    }

    /// Probes whether the underlying session still responds. Always false
    /// while disconnected.
    pub fn session_alive(&mut self) -> bool {
        match self.session.as_mut() {
            Some(session) => session.is_alive(),
            None => false,
        }
    }

    /// Tears the session down: disconnect notice, socket close, state reset.
    /// Idempotent and total; safe on a never-connected instance.
    pub fn disconnect(&mut self) {
        if let Some(mut session) = self.session.take() {
            session.shutdown();
            self.observer.on_status(StatusEvent::Disconnected);
        }
        self.state = ConnectionState::Disconnected;
    }
}

impl<T: Transport> Drop for RemoteFileFetcher<T> {
    fn drop(&mut self) {
        self.disconnect();
    }
}
