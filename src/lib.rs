//! Minimal blocking SSH client for fetching a single remote file over SFTP.
//!
//! The crate wraps the `ssh2` crate (libssh2 bindings) behind a small,
//! typed lifecycle: configure, connect, download into memory, disconnect.
//! No concurrency, no retries, no partial-file semantics; every failure
//! surfaces as a typed error the caller can branch on.

pub mod config;
pub mod error;
pub mod fetcher;
pub mod observer;
pub mod transport;

pub use config::{ClientConfig, FetchOptions};
pub use error::{ConfigError, ConnectError, ConnectResult, DownloadError, DownloadResult};
pub use fetcher::{ConnectionState, RemoteFileFetcher};
pub use observer::{NoopObserver, StatusEvent, StatusObserver, TracingObserver};
pub use transport::{Ssh2Transport, SshSession, Transport};
