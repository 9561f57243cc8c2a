//! Seam between the fetcher's lifecycle logic and the SSH library.
//!
//! The fetcher only ever talks to these traits; the production
//! implementation in [`ssh2`] adapts the blocking libssh2 bindings, and
//! tests substitute a scripted in-memory fake.

pub mod ssh2;

use std::io::Read;

use crate::config::{ClientConfig, FetchOptions};
use crate::error::{ConnectResult, DownloadResult};
use crate::observer::StatusObserver;

pub use self::ssh2::Ssh2Transport;

/// Establishes authenticated SSH sessions.
pub trait Transport {
    type Session: SshSession;

    /// Runs the full connect sequence: TCP connect, handshake, password
    /// authentication. Emits a status event after each successful step.
    /// On any failure, everything acquired so far is released before the
    /// error is returned.
    fn establish(
        &self,
        config: &ClientConfig,
        options: &FetchOptions,
        observer: &dyn StatusObserver,
    ) -> ConnectResult<Self::Session>;
}

/// One authenticated SSH session, exclusively owning its socket.
pub trait SshSession {
    type File: Read;

    /// Opens the SFTP subchannel and the remote path in read-only mode.
    /// The subchannel lives only as long as the returned file handle.
    fn open_remote(&mut self, path: &str) -> DownloadResult<Self::File>;

    /// Probes whether the transport still responds.
    fn is_alive(&mut self) -> bool;

    /// Total teardown: disconnect notice, close socket. Must not fail;
    /// close errors are logged and ignored.
    fn shutdown(&mut self);
}
