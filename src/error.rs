use thiserror::Error;

/// Configuration validation errors, raised at construction time
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Host must not be empty")]
    EmptyHost,

    #[error("Port must be in range 1-65535")]
    InvalidPort,

    #[error("Username must not be empty")]
    EmptyUsername,
}

/// Errors from establishing an SSH session
#[derive(Error, Debug)]
pub enum ConnectError {
    #[error("Already connected; disconnect first")]
    AlreadyConnected,

    #[error("Network unreachable: {0}")]
    NetworkUnreachable(String),

    #[error("Connection timed out after {0:?}")]
    Timeout(std::time::Duration),

    #[error("Failed to create SSH session: {0}")]
    SessionInitFailed(String),

    #[error("SSH handshake failed: {0}")]
    HandshakeFailed(String),

    // No payload: nothing from the auth exchange may appear in messages or logs.
    #[error("Authentication failed")]
    AuthFailed,
}

/// Errors from downloading a remote file
#[derive(Error, Debug)]
pub enum DownloadError {
    #[error("Not connected")]
    NotConnected,

    #[error("Remote path must not be empty")]
    InvalidPath,

    #[error("Failed to open SFTP subchannel: {0}")]
    SftpInitFailed(String),

    #[error("SSH session is dead")]
    SessionDead,

    #[error("Remote file not found: {0}")]
    FileNotFound(String),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Read failed after {bytes_read} bytes: {reason}")]
    Read { bytes_read: u64, reason: String },

    #[error("Remote file exceeds the {limit} byte limit")]
    FileTooLarge { limit: u64 },
}

pub type ConnectResult<T> = Result<T, ConnectError>;
pub type DownloadResult<T> = Result<T, DownloadError>;
