use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Target host and credentials for one SSH session.
///
/// Immutable once constructed; `new` rejects empty hosts/usernames and
/// port 0. The credential is redacted from `Debug` output and from
/// serialized form.
#[derive(Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    #[serde(skip_serializing, default)]
    credential: String,
}

impl ClientConfig {
    pub fn new(
        host: impl Into<String>,
        port: u16,
        username: impl Into<String>,
        credential: impl Into<String>,
    ) -> Result<Self, ConfigError> {
        let host = host.into();
        let username = username.into();

        if host.trim().is_empty() {
            return Err(ConfigError::EmptyHost);
        }
        if port == 0 {
            return Err(ConfigError::InvalidPort);
        }
        if username.trim().is_empty() {
            return Err(ConfigError::EmptyUsername);
        }

        Ok(Self {
            host,
            port,
            username,
            credential: credential.into(),
        })
    }

    /// Password for authentication. Crate-internal so it never leaves
    /// the transport layer.
    pub(crate) fn credential(&self) -> &str {
        &self.credential
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("credential", &"[REDACTED]")
            .finish()
    }
}

/// Tunables for connection setup and the download loop.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchOptions {
    /// Bound on the TCP connect; an unreachable host fails instead of
    /// hanging forever.
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout: Duration,
    /// Stall timeout applied to socket reads and writes.
    #[serde(default = "default_io_timeout")]
    pub io_timeout: Option<Duration>,
    /// Keepalive interval in seconds; also backs the liveness probe.
    #[serde(default = "default_keepalive")]
    pub keepalive_interval: u32,
    /// Size of each SFTP read, in bytes.
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,
    /// Cap on the accumulated download, `None` for unlimited.
    #[serde(default)]
    pub max_size: Option<u64>,
}

fn default_connect_timeout() -> Duration {
    Duration::from_secs(30)
}

fn default_io_timeout() -> Option<Duration> {
    Some(Duration::from_secs(60))
}

fn default_keepalive() -> u32 {
    20 // send keepalives every 20s by default
}

fn default_chunk_size() -> usize {
    32 * 1024
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            connect_timeout: default_connect_timeout(),
            io_timeout: default_io_timeout(),
            keepalive_interval: default_keepalive(),
            chunk_size: default_chunk_size(),
            max_size: None,
        }
    }
}

impl FetchOptions {
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    pub fn io_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.io_timeout = timeout;
        self
    }

    pub fn chunk_size(mut self, bytes: usize) -> Self {
        self.chunk_size = bytes.max(1);
        self
    }

    pub fn max_size(mut self, bytes: Option<u64>) -> Self {
        self.max_size = bytes;
        self
    }
}
