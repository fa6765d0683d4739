//! FTP login (USER/PASS)

use super::FtpClient;
use super::state::SessionState;
use crate::commands;
use crate::error::{FtpError, Result};
use crate::response::{FtpReply, codes};
use tracing::debug;

impl FtpClient {
    /// Log in with username and password (USER/PASS)
    ///
    /// Sends USER, then PASS unless the server already accepted the user
    /// with 230. Login succeeds only when the final reply is 230.
    ///
    /// The USER reply is not just informational: a 230 completes login
    /// without PASS, and a 4xx/5xx rejects it without sending the password.
    /// Otherwise the reply to PASS alone decides.
    ///
    /// A rejected login closes the control connection; the session cannot
    /// be used for further commands.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use ftp_rs::{FtpClient, ServerConfig};
    /// # use std::sync::Arc;
    /// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// let config = ServerConfig::anonymous("ftp.example.com");
    /// let mut client = FtpClient::connect(Arc::new(config)).await?;
    /// client.login("anonymous", "guest@example.com").await?;
    /// # Ok(())
    /// # }
    /// ```
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - [`FtpError::LoginRejected`] - Final reply was not 230
    /// - [`FtpError::SessionClosed`] - Session already closed
    /// - [`FtpError::ConnectionClosed`] - Server closed the connection
    /// - [`FtpError::Timeout`] - Server did not respond in time
    pub async fn login(&mut self, username: &str, password: &str) -> Result<()> {
        debug!("Logging in as {}", username);
        self.ensure_open()?;

        self.send_command(&commands::user(username)).await?;
        let response = self.read_reply().await?;

        let response = if response.code == codes::LOGGED_IN {
            response
        } else if response.is_error() {
            return self.reject_login(response).await;
        } else {
            self.send_command(&commands::pass(password)).await?;
            self.read_reply().await?
        };

        if response.code != codes::LOGGED_IN {
            return self.reject_login(response).await;
        }

        self.state = SessionState::Authenticated;
        debug!("Login successful: {}", response);
        Ok(())
    }

    /// Log in with the credentials from the session's [`ServerConfig`](crate::ServerConfig)
    pub async fn authenticate(&mut self) -> Result<()> {
        let config = self.config.clone();
        self.login(&config.username, &config.password).await
    }

    async fn reject_login(&mut self, response: FtpReply) -> Result<()> {
        debug!("Login rejected: {}", response);
        self.quit().await?;
        Err(FtpError::LoginRejected {
            code: response.code,
            message: response.text(),
        })
    }
}
