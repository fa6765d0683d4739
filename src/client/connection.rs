//! Connection management for FTP client
//!
//! This module handles TCP connection establishment, socket tuning,
//! server greeting validation and session teardown.

use crate::commands;
use crate::config::ServerConfig;
use crate::error::{FtpError, Result};
use crate::response::codes;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use super::FtpClient;
use super::io::with_deadline;
use super::state::SessionState;

/// Socket receive buffer for data transfers (1MB)
const RECV_BUFFER_SIZE: usize = 1024 * 1024;

/// Socket send buffer for uploads (1MB)
const SEND_BUFFER_SIZE: usize = 1024 * 1024;

/// BufReader capacity for the control connection
const BUFREADER_CAPACITY: usize = 8 * 1024;

/// Open a tuned TCP connection to `addr`, bounded by `limit` and `cancel`
///
/// Used for both the control connection and passive data connections.
/// Errors are raw ([`FtpError::Io`], [`FtpError::Timeout`],
/// [`FtpError::Cancelled`]); callers map them to their own failure kind.
pub(super) async fn open_stream(
    addr: SocketAddr,
    limit: Duration,
    cancel: &CancellationToken,
) -> Result<TcpStream> {
    use socket2::{Domain, Protocol, Socket, Type};

    let socket = Socket::new(Domain::for_address(addr), Type::STREAM, Some(Protocol::TCP))
        .map_err(FtpError::Io)?;

    // Commands are small request/response lines; don't let Nagle delay them
    socket.set_nodelay(true).map_err(FtpError::Io)?;

    if let Err(e) = socket.set_recv_buffer_size(RECV_BUFFER_SIZE) {
        warn!(
            "Failed to set receive buffer size to {} bytes: {}",
            RECV_BUFFER_SIZE, e
        );
    }
    if let Err(e) = socket.set_send_buffer_size(SEND_BUFFER_SIZE) {
        warn!(
            "Failed to set send buffer size to {} bytes: {}",
            SEND_BUFFER_SIZE, e
        );
    }

    // socket2::Socket::connect() is blocking, so run it on the blocking pool
    // NOTE: Connect BEFORE setting non-blocking mode
    let std_stream = with_deadline(cancel, limit, async move {
        tokio::task::spawn_blocking(move || -> std::io::Result<std::net::TcpStream> {
            socket.connect(&addr.into())?;
            socket.set_nonblocking(true)?;
            Ok(socket.into())
        })
        .await
        .map_err(|e| FtpError::Io(std::io::Error::other(format!("Task join error: {}", e))))?
        .map_err(FtpError::Io)
    })
    .await?;

    TcpStream::from_std(std_stream).map_err(FtpError::Io)
}

/// Map a failure while establishing the session to [`FtpError::ConnectionFailed`]
fn connection_failed(stage: &'static str) -> impl FnOnce(FtpError) -> FtpError {
    move |err| match err {
        FtpError::Cancelled => FtpError::Cancelled,
        FtpError::Timeout => FtpError::ConnectionFailed(format!("{} timed out", stage)),
        other => FtpError::ConnectionFailed(format!("{}: {}", stage, other)),
    }
}

impl FtpClient {
    /// Connect to an FTP server
    ///
    /// Resolves the configured host, opens the control connection and reads
    /// the greeting. Does not log in - call [`login`](Self::login) or
    /// [`authenticate`](Self::authenticate) after connecting.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - [`FtpError::ConnectionFailed`] - Resolution, TCP connect or the greeting
    ///   failed (timed out, closed, unparseable, or a code other than 220)
    /// - [`FtpError::Cancelled`] - The token fired while connecting
    pub async fn connect(config: Arc<ServerConfig>) -> Result<Self> {
        Self::connect_with_token(config, CancellationToken::new()).await
    }

    /// Connect with a caller-supplied cancellation token
    ///
    /// Cancelling `cancel` aborts the connect and, later, any operation on
    /// the returned session.
    pub async fn connect_with_token(
        config: Arc<ServerConfig>,
        cancel: CancellationToken,
    ) -> Result<Self> {
        debug!("Connecting to FTP server {}:{}", config.host, config.port);

        let peer = with_deadline(&cancel, config.timeouts.connect, async {
            tokio::net::lookup_host((config.host.as_str(), config.port))
                .await
                .map_err(FtpError::Io)?
                .next()
                .ok_or_else(|| {
                    FtpError::Io(std::io::Error::new(
                        std::io::ErrorKind::InvalidInput,
                        "No address resolved",
                    ))
                })
        })
        .await
        .map_err(connection_failed("resolve"))?;

        let tcp_stream = open_stream(peer, config.timeouts.connect, &cancel)
            .await
            .map_err(connection_failed("connect"))?;

        let mut stream = BufReader::with_capacity(BUFREADER_CAPACITY, tcp_stream);

        // Read server greeting
        let greeting = with_deadline(
            &cancel,
            config.timeouts.reply,
            super::io::read_reply(&mut stream),
        )
        .await
        .map_err(connection_failed("greeting"))?;
        debug!("Server greeting: {} {}", greeting.code, greeting.message);

        if greeting.code != codes::SERVICE_READY {
            // Dropping the stream closes the control connection
            return Err(FtpError::ConnectionFailed(format!(
                "greeting {}: {}",
                greeting.code,
                greeting.text()
            )));
        }

        Ok(Self {
            stream,
            state: SessionState::Connected,
            config,
            cancel,
            welcome: greeting,
            peer,
        })
    }

    /// Close the control connection without sending QUIT
    ///
    /// The server sees the connection drop and ends the session on its side.
    /// Calling this on a closed session is a no-op. Use
    /// [`logout`](Self::logout) for a protocol-level goodbye.
    pub async fn quit(&mut self) -> Result<()> {
        if self.is_closed() {
            return Ok(());
        }
        debug!("Closing FTP connection to {}", self.peer);

        self.mark_closed();
        // The session is over either way; a failed FIN is not worth reporting
        if let Err(e) = self.stream.get_mut().shutdown().await {
            debug!("Control connection shutdown failed: {}", e);
        }
        Ok(())
    }

    /// Send QUIT, wait for the 221 reply, then close the control connection
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - [`FtpError::SessionClosed`] - Session already closed
    /// - [`FtpError::OperationRejected`] - Server answered QUIT with an error
    /// - [`FtpError::Timeout`] - Server did not respond in time
    pub async fn logout(&mut self) -> Result<()> {
        debug!("Logging out of {}", self.peer);

        self.send_command(commands::quit()).await?;
        let reply = self.read_reply().await;
        self.quit().await?;

        let reply = reply?;
        debug!("QUIT reply: {}", reply);
        if reply.is_error() {
            return Err(FtpError::OperationRejected {
                code: reply.code,
                message: reply.text(),
            });
        }
        Ok(())
    }
}
