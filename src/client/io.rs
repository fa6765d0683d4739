//! Low-level I/O operations for FTP control connection communication
//!
//! This module provides the core I/O primitives used by all FTP client operations:
//! - Command transmission with logging
//! - Reply delimiting (CRLF splitting, multi-line assembly)
//! - The wait loop that skips transient replies until a terminal one
//! - Deadline and cancellation handling

use super::FtpClient;
use crate::commands;
use crate::error::{FtpError, Result};
use crate::response::{Exchange, FtpReply};
use std::future::Future;
use std::time::Duration;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWriteExt};
use tokio::time::timeout;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

/// Upper bound on lines in one multi-line reply, against servers that never close it
const MAX_REPLY_LINES: usize = 4096;

/// Run `fut` bounded by `limit` and by `cancel`
///
/// Cancellation wins over a simultaneously completed deadline.
pub(super) async fn with_deadline<T>(
    cancel: &CancellationToken,
    limit: Duration,
    fut: impl Future<Output = Result<T>>,
) -> Result<T> {
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(FtpError::Cancelled),
        outcome = timeout(limit, fut) => outcome.map_err(|_| FtpError::Timeout)?,
    }
}

/// Read one CRLF (or bare LF) terminated line
///
/// A peer that closes before the terminator arrives has not delivered a line.
async fn read_line<R>(reader: &mut R) -> Result<String>
where
    R: AsyncBufRead + Unpin,
{
    let mut line_bytes = Vec::with_capacity(128);
    reader.read_until(b'\n', &mut line_bytes).await?;

    if line_bytes.last() != Some(&b'\n') {
        return Err(FtpError::ConnectionClosed);
    }

    // Convert to string with lossy UTF-8 conversion
    let line = String::from_utf8_lossy(&line_bytes);
    let line = line.trim_end_matches(['\r', '\n']).to_string();
    trace!("Received: {}", line);
    Ok(line)
}

/// Read one complete FTP reply from a buffered reader
///
/// Multi-line replies look like:
/// ```text
/// 220-Welcome to the archive
///  contact: ftp@example.com
/// 220 Ready
/// ```
/// The reply ends at the first line that starts with the opening code
/// followed by a space. Bytes after the reply stay buffered for the next call,
/// so replies coalesced into one TCP segment are delimited correctly.
///
/// # Errors
///
/// - [`FtpError::ConnectionClosed`] - The peer closed before the reply completed
/// - [`FtpError::InvalidResponse`] - The first line is not an FTP reply line
pub async fn read_reply<R>(reader: &mut R) -> Result<FtpReply>
where
    R: AsyncBufRead + Unpin,
{
    let first = read_line(reader).await?;
    let opening = commands::parse_reply_line(&first)?;

    let mut reply = FtpReply::new(opening.code, opening.text);
    if opening.last {
        return Ok(reply);
    }

    loop {
        let line = read_line(reader).await?;
        if commands::closes_multiline(&line, reply.code) {
            let closing = commands::parse_reply_line(&line)?;
            reply.lines.push(closing.text);
            return Ok(reply);
        }
        // Continuation lines are kept verbatim, including any "NNN-" prefix
        reply.lines.push(line);
        if reply.lines.len() > MAX_REPLY_LINES {
            return Err(FtpError::InvalidResponse(format!(
                "Multi-line {} reply exceeds {} lines",
                reply.code, MAX_REPLY_LINES
            )));
        }
    }
}

impl FtpClient {
    /// Send a command to the server
    ///
    /// A command with an embedded line break is refused before anything is
    /// written; the session stays usable.
    pub(super) async fn send_command(&mut self, command: &str) -> Result<()> {
        self.ensure_open()?;
        commands::validate(command)?;
        trace!("Sending command: {}", commands::redact(command));

        let cancel = self.cancel.clone();
        let limit = self.config.timeouts.reply;
        let writer = self.stream.get_mut();
        let result = with_deadline(&cancel, limit, async {
            writer.write_all(command.as_bytes()).await?;
            writer.flush().await?;
            Ok::<(), FtpError>(())
        })
        .await;

        if result.is_err() {
            self.mark_closed();
        }
        result
    }

    /// Read one complete reply from the control connection
    ///
    /// Any failure here leaves the reply stream out of step with the commands
    /// sent, so it closes the session.
    pub(super) async fn read_reply(&mut self) -> Result<FtpReply> {
        self.ensure_open()?;

        let cancel = self.cancel.clone();
        let limit = self.config.timeouts.reply;
        let result = with_deadline(&cancel, limit, read_reply(&mut self.stream)).await;

        if result.is_err() {
            self.mark_closed();
        }
        result
    }

    /// Read replies until one is terminal for the current command
    ///
    /// Terminal means the code is `expected`, `failure`, or any other 4xx/5xx
    /// code. A failure code returns immediately; the caller decides what it
    /// means for the operation.
    pub(super) async fn read_until_code(&mut self, expected: u16, failure: u16) -> Result<Exchange> {
        self.read_until_any(&[expected], failure).await
    }

    /// [`read_until_code`](Self::read_until_code) with several success codes
    pub(super) async fn read_until_any(
        &mut self,
        expected: &[u16],
        failure: u16,
    ) -> Result<Exchange> {
        let mut intermediate = Vec::new();
        loop {
            let reply = self.read_reply().await?;
            if expected.contains(&reply.code) || reply.code == failure || reply.is_error() {
                return Ok(Exchange::new(intermediate, reply));
            }
            debug!("Intermediate reply: {}", reply);
            intermediate.push(reply);
        }
    }
}

/// Turn a terminal reply that is not `expected` into an error
pub(super) fn require(exchange: Exchange, expected: &[u16]) -> Result<Exchange> {
    let terminal = exchange.terminal();
    if expected.contains(&terminal.code) {
        Ok(exchange)
    } else {
        Err(FtpError::OperationRejected {
            code: terminal.code,
            message: terminal.text(),
        })
    }
}
