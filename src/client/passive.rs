//! Passive-mode data channel negotiation (PASV)

use super::FtpClient;
use super::connection::open_stream;
use crate::commands;
use crate::error::{FtpError, Result};
use crate::response::{Exchange, codes};
use std::net::SocketAddr;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;
use tracing::{debug, trace};

/// Data connection for a single transfer
///
/// Opened by [`FtpClient::open_passive_channel`] and never reused: the
/// server expects a fresh PASV for every data-bearing command. Dropping the
/// value closes the socket.
#[derive(Debug)]
pub struct DataConnection {
    stream: TcpStream,
    peer: SocketAddr,
}

impl DataConnection {
    /// Address the server advertised in its 227 reply
    pub fn peer_addr(&self) -> SocketAddr {
        self.peer
    }

    /// Underlying socket, for reading or writing transfer bytes
    pub fn stream_mut(&mut self) -> &mut TcpStream {
        &mut self.stream
    }

    /// Half-close the connection so the server sees end-of-file
    pub async fn close(mut self) -> Result<()> {
        self.stream
            .shutdown()
            .await
            .map_err(|e| FtpError::DataTransfer(format!("shutdown failed: {}", e)))
    }
}

impl Drop for DataConnection {
    fn drop(&mut self) {
        trace!("Data connection to {} closed", self.peer);
    }
}

impl FtpClient {
    /// Negotiate a passive data channel and connect to it
    ///
    /// Sends PASV, waits for 227 (skipping transient replies), parses the
    /// advertised `(h1,h2,h3,h4,p1,p2)` address and opens a TCP connection
    /// to it. The returned exchange holds every reply to PASV.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - [`FtpError::OperationRejected`] - Server refused PASV; no connect attempted
    /// - [`FtpError::MalformedPassiveReply`] - 227 reply has no usable tuple; no connect attempted
    /// - [`FtpError::DataConnectFailed`] - Connecting to the advertised address failed
    /// - [`FtpError::NotAuthenticated`] - Not logged in
    pub async fn open_passive_channel(&mut self) -> Result<(DataConnection, Exchange)> {
        self.ensure_authenticated()?;

        self.send_command(commands::pasv()).await?;
        let exchange = self
            .read_until_code(codes::ENTERING_PASSIVE_MODE, codes::ACTION_NOT_TAKEN)
            .await?;
        let exchange = super::io::require(exchange, &[codes::ENTERING_PASSIVE_MODE])?;

        let addr = SocketAddr::V4(commands::parse_pasv_reply(exchange.terminal())?);
        debug!("Passive data address: {}", addr);

        let stream = match open_stream(addr, self.config.timeouts.connect, &self.cancel).await {
            Ok(stream) => stream,
            Err(FtpError::Cancelled) => {
                self.mark_closed();
                return Err(FtpError::Cancelled);
            }
            Err(FtpError::Timeout) => {
                return Err(FtpError::DataConnectFailed(format!(
                    "connect to {} timed out",
                    addr
                )));
            }
            Err(other) => {
                return Err(FtpError::DataConnectFailed(format!("{}: {}", addr, other)));
            }
        };

        Ok((DataConnection { stream, peer: addr }, exchange))
    }
}
