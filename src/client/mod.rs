//! FTP client implementation with passive-mode transfers

mod auth;
mod connection;
mod directory;
mod io;
mod passive;
mod state;
mod transfer;

pub use io::read_reply;
pub use passive::DataConnection;
pub use transfer::{DirectoryListing, TransferSummary};

use crate::config::ServerConfig;
use crate::error::{FtpError, Result};
use crate::response::FtpReply;
use state::SessionState;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::io::BufReader;
use tokio::net::TcpStream;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Async FTP client session
///
/// One value per control connection. Every operation takes `&mut self`, so
/// commands on a session are strictly sequential, and each data-bearing
/// operation opens its own passive data connection.
///
/// # Example
///
/// ```no_run
/// use ftp_rs::{FtpClient, ServerConfig};
/// use std::sync::Arc;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = ServerConfig::standard("ftp.example.com", "user", "pass");
/// let mut client = FtpClient::connect(Arc::new(config)).await?;
/// client.authenticate().await?;
///
/// let listing = client.list_directory(None).await?;
/// println!("{}", listing.text);
///
/// client.logout().await?;
/// # Ok(())
/// # }
/// ```
#[must_use]
pub struct FtpClient {
    /// Control connection (reader and writer)
    stream: BufReader<TcpStream>,
    /// Session state
    state: SessionState,
    /// Server configuration
    config: Arc<ServerConfig>,
    /// Fires to abort whatever the session is blocked on
    cancel: CancellationToken,
    /// 220 greeting received on connect
    welcome: FtpReply,
    /// Control connection peer
    peer: SocketAddr,
}

impl FtpClient {
    /// Check if the client is currently logged in
    pub fn is_authenticated(&self) -> bool {
        self.state == SessionState::Authenticated
    }

    /// Check if the session has been closed
    pub fn is_closed(&self) -> bool {
        self.state == SessionState::Closed
    }

    /// Greeting the server sent on connect
    pub fn welcome(&self) -> &FtpReply {
        &self.welcome
    }

    /// Address of the server's control port
    pub fn peer_addr(&self) -> SocketAddr {
        self.peer
    }

    /// Configuration this session was opened with
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Token that aborts the session's in-flight operation when cancelled
    ///
    /// Cancelling closes the session: a reply may be half-read, so the control
    /// connection can no longer be trusted.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Mark the session closed after a fatal error
    fn mark_closed(&mut self) {
        if self.state != SessionState::Closed {
            debug!("FTP session to {} closed", self.peer);
        }
        self.state = SessionState::Closed;
    }

    /// Fail unless the control connection is still usable
    fn ensure_open(&self) -> Result<()> {
        match self.state {
            SessionState::Closed => Err(FtpError::SessionClosed),
            _ => Ok(()),
        }
    }

    /// Fail unless the session is logged in
    fn ensure_authenticated(&self) -> Result<()> {
        match self.state {
            SessionState::Authenticated => Ok(()),
            SessionState::Connected => Err(FtpError::NotAuthenticated),
            SessionState::Closed => Err(FtpError::SessionClosed),
        }
    }
}

impl std::fmt::Debug for FtpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FtpClient")
            .field("peer", &self.peer)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl Drop for FtpClient {
    fn drop(&mut self) {
        debug!("FtpClient dropped");
    }
}
