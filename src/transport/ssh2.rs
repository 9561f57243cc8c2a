//! Production transport over the `ssh2` crate (libssh2 bindings).
//!
//! libssh2's process-wide initialization is guarded by a `Once` inside the
//! `ssh2` crate on first `Session::new`, so constructing any number of
//! transports and sessions is safe.

use std::net::{SocketAddr, TcpStream, ToSocketAddrs};
use std::path::Path;

use ssh2::{DisconnectCode, ErrorCode, Session};

use crate::config::{ClientConfig, FetchOptions};
use crate::error::{ConnectError, ConnectResult, DownloadError, DownloadResult};
use crate::observer::{StatusEvent, StatusObserver};

use super::{SshSession, Transport};

// libssh2 SFTP status codes we care about when classifying open failures.
const LIBSSH2_FX_PERMISSION_DENIED: i32 = 3;

/// Blocking SSH transport backed by libssh2.
#[derive(Debug, Default)]
pub struct Ssh2Transport;

impl Transport for Ssh2Transport {
    type Session = Ssh2Session;

    fn establish(
        &self,
        config: &ClientConfig,
        options: &FetchOptions,
        observer: &dyn StatusObserver,
    ) -> ConnectResult<Self::Session> {
        tracing::info!(
            host = %config.host,
            port = config.port,
            username = %config.username,
            "Connecting"
        );

        let addr = resolve(&config.host, config.port)?;
        let tcp = TcpStream::connect_timeout(&addr, options.connect_timeout).map_err(|e| {
            if e.kind() == std::io::ErrorKind::TimedOut {
                ConnectError::Timeout(options.connect_timeout)
            } else {
                ConnectError::NetworkUnreachable(format!(
                    "TCP connect to {}:{} failed: {}",
                    config.host, config.port, e
                ))
            }
        })?;

        tcp.set_read_timeout(options.io_timeout)
            .and_then(|_| tcp.set_write_timeout(options.io_timeout))
            .map_err(|e| ConnectError::SessionInitFailed(format!("Failed to set timeouts: {}", e)))?;

        observer.on_status(StatusEvent::Connected {
            host: config.host.clone(),
            port: config.port,
        });

        let mut session = Session::new()
            .map_err(|e| ConnectError::SessionInitFailed(e.to_string()))?;

        // Keep our own handle to the socket so teardown can close it even
        // if libssh2 is wedged.
        let tcp_keep = tcp
            .try_clone()
            .map_err(|e| ConnectError::SessionInitFailed(format!("Failed to clone socket: {}", e)))?;

        session.set_tcp_stream(tcp);
        session.set_keepalive(true, options.keepalive_interval);

        session
            .handshake()
            .map_err(|e| ConnectError::HandshakeFailed(e.to_string()))?;

        observer.on_status(StatusEvent::HandshakeComplete);

        // The ssh2 error for a rejected password is discarded: nothing from
        // the auth exchange may end up in messages or logs.
        session
            .userauth_password(&config.username, config.credential())
            .map_err(|_| ConnectError::AuthFailed)?;

        if !session.authenticated() {
            return Err(ConnectError::AuthFailed);
        }

        observer.on_status(StatusEvent::Authenticated {
            username: config.username.clone(),
        });

        tracing::info!(host = %config.host, "SSH session established");

        Ok(Ssh2Session {
            session,
            _tcp: tcp_keep,
        })
    }
}

fn resolve(host: &str, port: u16) -> ConnectResult<SocketAddr> {
    (host, port)
        .to_socket_addrs()
        .map_err(|e| {
            ConnectError::NetworkUnreachable(format!("Failed to resolve {}:{}: {}", host, port, e))
        })?
        .next()
        .ok_or_else(|| {
            ConnectError::NetworkUnreachable(format!("No address found for {}:{}", host, port))
        })
}

/// An authenticated libssh2 session owning its socket.
pub struct Ssh2Session {
    session: Session,
    _tcp: TcpStream,
}

impl SshSession for Ssh2Session {
    type File = ssh2::File;

    fn open_remote(&mut self, path: &str) -> DownloadResult<Self::File> {
        let sftp = self
            .session
            .sftp()
            .map_err(|e| DownloadError::SftpInitFailed(e.to_string()))?;

        // The returned File keeps the subchannel alive internally; dropping
        // it closes the handle and then the channel, on every exit path.
        sftp.open(Path::new(path))
            .map_err(|e| classify_open_error(e.code(), path, e.to_string()))
    }

    fn is_alive(&mut self) -> bool {
        self.session.keepalive_send().is_ok()
    }

    fn shutdown(&mut self) {
        if let Err(e) =
            self.session
                .disconnect(Some(DisconnectCode::ByApplication), "Client closing", None)
        {
            tracing::debug!("SSH disconnect notice failed: {}", e);
        }
        if let Err(e) = self._tcp.shutdown(std::net::Shutdown::Both) {
            tracing::debug!("Socket shutdown failed: {}", e);
        }
    }
}

/// Maps an SFTP open failure onto the download error taxonomy. Only
/// permission denial is reliably distinguishable from the status code;
/// everything else reports as not-found with the path and reason.
fn classify_open_error(code: ErrorCode, path: &str, reason: String) -> DownloadError {
    match code {
        ErrorCode::SFTP(LIBSSH2_FX_PERMISSION_DENIED) => {
            DownloadError::PermissionDenied(path.to_string())
        }
        _ => DownloadError::FileNotFound(format!("{}: {}", path, reason)),
    }
}
