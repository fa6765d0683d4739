//! Directory and file management commands (CWD, MKD, RMD, DELE)

use super::FtpClient;
use super::io::require;
use crate::commands;
use crate::error::Result;
use crate::response::{Exchange, codes};
use tracing::debug;

impl FtpClient {
    /// Change the working directory (CWD)
    ///
    /// Waits for 250, skipping transient replies; 550 or any other 4xx/5xx
    /// ends the wait at once. Returns every reply received.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - [`FtpError::OperationRejected`](crate::FtpError::OperationRejected) - Server refused (e.g., 550)
    /// - [`FtpError::NotAuthenticated`](crate::FtpError::NotAuthenticated) - Not logged in
    /// - [`FtpError::Timeout`](crate::FtpError::Timeout) - Server did not respond in time
    pub async fn change_directory(&mut self, dir: &str) -> Result<Exchange> {
        debug!("Changing directory to {}", dir);
        self.simple_command(&commands::cwd(dir), codes::FILE_ACTION_OKAY)
            .await
    }

    /// Create a directory (MKD), expecting 257
    pub async fn make_directory(&mut self, dir: &str) -> Result<Exchange> {
        debug!("Creating directory {}", dir);
        self.simple_command(&commands::mkd(dir), codes::PATHNAME_CREATED)
            .await
    }

    /// Remove a directory (RMD), expecting 250
    pub async fn remove_directory(&mut self, dir: &str) -> Result<Exchange> {
        debug!("Removing directory {}", dir);
        self.simple_command(&commands::rmd(dir), codes::FILE_ACTION_OKAY)
            .await
    }

    /// Delete a file (DELE)
    ///
    /// A passive channel is negotiated first and released unused before
    /// DELE is sent; the PASV replies are part of the returned exchange.
    /// The DELE reply is always consumed (250 success, 550 failure) so the
    /// next command starts in step.
    pub async fn delete_file(&mut self, name: &str) -> Result<Exchange> {
        debug!("Deleting file {}", name);

        let command = commands::dele(name);
        commands::validate(&command)?;

        let (data, mut exchange) = self.open_passive_channel().await?;
        drop(data);

        let deleted = self
            .simple_command(&command, codes::FILE_ACTION_OKAY)
            .await?;
        exchange.extend(deleted);
        Ok(exchange)
    }

    /// Send a command and wait for `expected` or a failure code
    async fn simple_command(&mut self, command: &str, expected: u16) -> Result<Exchange> {
        self.ensure_authenticated()?;
        self.send_command(command).await?;
        let exchange = self
            .read_until_code(expected, codes::ACTION_NOT_TAKEN)
            .await?;
        require(exchange, &[expected])
    }
}
