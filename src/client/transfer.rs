//! Data transfers over passive connections (LIST, RETR, STOR)
//!
//! Every transfer follows the same sequence:
//! 1. Negotiate a fresh passive data connection (PASV)
//! 2. Send the command and read the opening reply (125/150)
//! 3. Stream bytes over the data connection in `chunk_size` pieces
//! 4. Close the data connection and read the completion reply (226/250)
//!
//! The opening reply is read before any bytes move, and the completion reply
//! only after the data connection is gone, so neither side waits on the other.

use super::FtpClient;
use super::io::{require, with_deadline};
use super::passive::DataConnection;
use crate::commands;
use crate::error::{FtpError, Result};
use crate::response::{Exchange, codes};
use std::path::Path;
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace, warn};

/// Completion codes accepted after the data connection closes
const COMPLETION_CODES: &[u16] = &[codes::CLOSING_DATA, codes::FILE_ACTION_OKAY];

/// Result of a LIST command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryListing {
    /// Listing as sent by the server (lossy UTF-8)
    pub text: String,
    /// Every control reply for the operation, PASV through completion
    pub exchange: Exchange,
}

impl DirectoryListing {
    /// Listing entries, one per line, without line terminators
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.text.lines().filter(|line| !line.is_empty())
    }
}

/// Result of a RETR or STOR command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferSummary {
    /// Bytes moved over the data connection
    pub bytes: u64,
    /// Every control reply for the operation, PASV through completion
    pub exchange: Exchange,
}

/// Data connection plus the replies that opened it
struct Opening {
    data: DataConnection,
    exchange: Exchange,
    /// The opening reply was already a 2xx completion
    finished: bool,
}

fn stalled(limit: Duration) -> impl FnOnce(FtpError) -> FtpError {
    move |err| match err {
        FtpError::Timeout => {
            FtpError::DataTransfer(format!("data connection stalled for {:?}", limit))
        }
        other => other,
    }
}

/// Copy everything the server sends on `data` into `sink`
///
/// Stops at end-of-stream and flushes the sink. Data-side failures are
/// [`FtpError::DataTransfer`]; sink failures are [`FtpError::LocalIo`].
async fn receive_chunks<D, W>(
    data: &mut D,
    sink: &mut W,
    chunk_size: usize,
    limit: Duration,
    cancel: &CancellationToken,
) -> Result<u64>
where
    D: AsyncRead + Unpin + ?Sized,
    W: AsyncWrite + Unpin + ?Sized,
{
    let mut buf = vec![0u8; chunk_size.max(1)];
    let mut total: u64 = 0;

    loop {
        let n = with_deadline(cancel, limit, async {
            data.read(&mut buf)
                .await
                .map_err(|e| FtpError::DataTransfer(e.to_string()))
        })
        .await
        .map_err(stalled(limit))?;

        if n == 0 {
            break;
        }
        sink.write_all(&buf[..n]).await.map_err(FtpError::LocalIo)?;
        total += n as u64;
        trace!("Received {} bytes ({} total)", n, total);
    }

    sink.flush().await.map_err(FtpError::LocalIo)?;
    Ok(total)
}

/// Copy `source` onto `data` until the source is exhausted
///
/// An empty source writes nothing.
async fn send_chunks<R, D>(
    source: &mut R,
    data: &mut D,
    chunk_size: usize,
    limit: Duration,
    cancel: &CancellationToken,
) -> Result<u64>
where
    R: AsyncRead + Unpin + ?Sized,
    D: AsyncWrite + Unpin + ?Sized,
{
    let mut buf = vec![0u8; chunk_size.max(1)];
    let mut total: u64 = 0;

    loop {
        let n = source.read(&mut buf).await.map_err(FtpError::LocalIo)?;
        if n == 0 {
            break;
        }

        let chunk = &buf[..n];
        with_deadline(cancel, limit, async {
            data.write_all(chunk)
                .await
                .map_err(|e| FtpError::DataTransfer(e.to_string()))
        })
        .await
        .map_err(stalled(limit))?;

        total += n as u64;
        trace!("Sent {} bytes ({} total)", n, total);
    }

    Ok(total)
}

impl FtpClient {
    /// List a directory (LIST)
    ///
    /// With no pattern, sends `LIST *`. Reads the data connection until the
    /// server closes it, so listings larger than one chunk arrive whole.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - [`FtpError::OperationRejected`] - Server refused PASV or LIST
    /// - [`FtpError::MalformedPassiveReply`] - Unusable 227 reply
    /// - [`FtpError::DataConnectFailed`] - Could not reach the passive port
    /// - [`FtpError::DataTransfer`] - Data connection failed mid-listing
    pub async fn list_directory(&mut self, pattern: Option<&str>) -> Result<DirectoryListing> {
        debug!("Listing {}", pattern.unwrap_or("*"));

        let mut opening = self.begin_transfer(&commands::list(pattern)).await?;
        let mut text = Vec::new();
        let outcome = self
            .receive(opening.data.stream_mut(), &mut text)
            .await;
        drop(opening.data);

        let summary = self
            .finish_transfer(opening.exchange, opening.finished, outcome)
            .await?;
        Ok(DirectoryListing {
            text: String::from_utf8_lossy(&text).into_owned(),
            exchange: summary.exchange,
        })
    }

    /// Download a remote file into `sink` (RETR)
    ///
    /// A 550 opening reply ends the operation before any data is read.
    /// Bytes are copied in `chunk_size` pieces; the sink is flushed before
    /// the completion reply is read.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use ftp_rs::FtpClient;
    /// # async fn example(client: &mut FtpClient) -> Result<(), Box<dyn std::error::Error>> {
    /// let mut contents = Vec::new();
    /// let summary = client.download("readme.txt", &mut contents).await?;
    /// assert_eq!(summary.bytes, contents.len() as u64);
    /// # Ok(())
    /// # }
    /// ```
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - [`FtpError::OperationRejected`] - Server refused RETR (e.g., 550 no such file)
    /// - [`FtpError::DataTransfer`] - Data connection failed or stalled
    /// - [`FtpError::LocalIo`] - Writing to `sink` failed
    pub async fn download<W>(&mut self, remote: &str, sink: &mut W) -> Result<TransferSummary>
    where
        W: AsyncWrite + Unpin + ?Sized,
    {
        debug!("Downloading {}", remote);

        let mut opening = self.begin_transfer(&commands::retr(remote)).await?;
        let outcome = self.receive(opening.data.stream_mut(), sink).await;
        drop(opening.data);

        self.finish_transfer(opening.exchange, opening.finished, outcome)
            .await
    }

    /// Download a remote file into a local file, creating or truncating it
    pub async fn download_to_path(
        &mut self,
        remote: &str,
        local: impl AsRef<Path>,
    ) -> Result<TransferSummary> {
        let mut file = tokio::fs::File::create(local.as_ref())
            .await
            .map_err(FtpError::LocalIo)?;
        self.download(remote, &mut file).await
    }

    /// Upload `source` to a remote file (STOR)
    ///
    /// Copies the source in `chunk_size` pieces, shuts the data connection
    /// down so the server sees end-of-file, then waits for the completion
    /// reply.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - [`FtpError::OperationRejected`] - Server refused STOR or the completion
    /// - [`FtpError::DataTransfer`] - Data connection failed or stalled
    /// - [`FtpError::LocalIo`] - Reading from `source` failed
    pub async fn upload<R>(&mut self, remote: &str, source: &mut R) -> Result<TransferSummary>
    where
        R: AsyncRead + Unpin + ?Sized,
    {
        debug!("Uploading {}", remote);

        let Opening {
            mut data,
            exchange,
            finished,
        } = self.begin_transfer(&commands::stor(remote)).await?;

        let outcome = if finished {
            // Server completed without reading; nothing to send
            drop(data);
            Ok(0)
        } else {
            let chunk_size = self.config.chunk_size;
            let limit = self.config.timeouts.data;
            let sent =
                send_chunks(source, data.stream_mut(), chunk_size, limit, &self.cancel).await;
            match sent {
                Ok(bytes) => with_deadline(&self.cancel, limit, data.close())
                    .await
                    .map_err(stalled(limit))
                    .map(|()| bytes),
                Err(e) => {
                    drop(data);
                    Err(e)
                }
            }
        };

        self.finish_transfer(exchange, finished, outcome).await
    }

    /// Upload a local file to a remote file
    ///
    /// The local file is opened before anything is sent to the server.
    pub async fn upload_from_path(
        &mut self,
        remote: &str,
        local: impl AsRef<Path>,
    ) -> Result<TransferSummary> {
        let mut file = tokio::fs::File::open(local.as_ref())
            .await
            .map_err(FtpError::LocalIo)?;
        self.upload(remote, &mut file).await
    }

    /// Negotiate PASV, send `command` and read its opening reply
    ///
    /// A 4xx/5xx opening reply is terminal: no completion reply follows, and
    /// the data connection is dropped unused.
    async fn begin_transfer(&mut self, command: &str) -> Result<Opening> {
        // Refuse a bad argument before a passive port is opened for it
        commands::validate(command)?;
        let (data, mut exchange) = self.open_passive_channel().await?;

        self.send_command(command).await?;
        let reply = self.read_reply().await?;

        if !reply.is_preliminary() && !reply.is_success() {
            debug!("Transfer refused: {}", reply);
            return Err(FtpError::OperationRejected {
                code: reply.code,
                message: reply.text(),
            });
        }

        let finished = reply.is_success();
        if finished {
            debug!("Transfer completed before data moved: {}", reply);
        }
        exchange.extend(Exchange::single(reply));

        Ok(Opening {
            data,
            exchange,
            finished,
        })
    }

    /// Drain the data connection into `sink` under the session's limits
    async fn receive<W>(
        &self,
        data: &mut tokio::net::TcpStream,
        sink: &mut W,
    ) -> Result<u64>
    where
        W: AsyncWrite + Unpin + ?Sized,
    {
        receive_chunks(
            data,
            sink,
            self.config.chunk_size,
            self.config.timeouts.data,
            &self.cancel,
        )
        .await
    }

    /// Read the completion reply and combine it with the transfer outcome
    ///
    /// The data connection must already be closed. The completion reply is
    /// consumed even when the transfer failed, so the control connection
    /// stays in step; a control failure takes precedence over the transfer
    /// failure.
    async fn finish_transfer(
        &mut self,
        mut exchange: Exchange,
        finished: bool,
        outcome: Result<u64>,
    ) -> Result<TransferSummary> {
        if let Err(FtpError::Cancelled) = outcome {
            self.mark_closed();
            return Err(FtpError::Cancelled);
        }

        if finished {
            let bytes = outcome?;
            return Ok(TransferSummary { bytes, exchange });
        }

        let completion = self
            .read_until_any(COMPLETION_CODES, codes::ACTION_NOT_TAKEN)
            .await?;

        let bytes = match outcome {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!(
                    "Transfer failed: {} (server reply: {})",
                    e,
                    completion.terminal()
                );
                return Err(e);
            }
        };

        exchange.extend(require(completion, COMPLETION_CODES)?);
        debug!("Transfer complete: {} bytes", bytes);
        Ok(TransferSummary { bytes, exchange })
    }
}
