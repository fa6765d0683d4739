//! FTP error types

use thiserror::Error;

/// FTP protocol, connection and transfer errors
#[derive(Error, Debug)]
pub enum FtpError {
    /// IO error on the control connection
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Control connection deadline elapsed
    #[error("Connection timeout")]
    Timeout,

    /// The session's cancellation token fired
    #[error("Operation cancelled")]
    Cancelled,

    /// Could not establish the control connection, or the greeting was not 220
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Final login reply was not 230
    #[error("Login rejected {code}: {message}")]
    LoginRejected {
        /// FTP reply code (e.g., 530)
        code: u16,
        /// Reply text from server
        message: String,
    },

    /// PASV reply did not carry a usable `(h1,h2,h3,h4,p1,p2)` tuple
    #[error("Malformed passive reply: {0}")]
    MalformedPassiveReply(String),

    /// Server answered an operation with a failure code
    #[error("FTP error {code}: {message}")]
    OperationRejected {
        /// FTP reply code (e.g., 550)
        code: u16,
        /// Reply text from server
        message: String,
    },

    /// Could not connect to the advertised passive address
    #[error("Data connection failed: {0}")]
    DataConnectFailed(String),

    /// Data socket failed or stalled mid-transfer
    #[error("Data transfer failed: {0}")]
    DataTransfer(String),

    /// Local sink or source failed mid-transfer
    #[error("Local IO error: {0}")]
    LocalIo(std::io::Error),

    /// Server closed the control connection
    #[error("Connection closed")]
    ConnectionClosed,

    /// Bytes on the control connection are not an FTP reply
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Command argument would break the command line (embedded CR or LF)
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Command requires a logged-in session
    #[error("Not logged in")]
    NotAuthenticated,

    /// Session was closed by quit, logout, a rejected login or a fatal error
    #[error("Session closed")]
    SessionClosed,
}

impl FtpError {
    /// Whether this error ends the session.
    ///
    /// Per-operation failures (rejected command, malformed PASV reply, data
    /// channel trouble, local file errors, unsendable arguments) leave the
    /// control connection in sync and usable. Everything else does not.
    pub fn is_session_fatal(&self) -> bool {
        !matches!(
            self,
            FtpError::MalformedPassiveReply(_)
                | FtpError::OperationRejected { .. }
                | FtpError::DataConnectFailed(_)
                | FtpError::DataTransfer(_)
                | FtpError::LocalIo(_)
                | FtpError::InvalidArgument(_)
                | FtpError::NotAuthenticated
        )
    }

    /// Reply code carried by this error, if any
    pub fn code(&self) -> Option<u16> {
        match self {
            FtpError::LoginRejected { code, .. } | FtpError::OperationRejected { code, .. } => {
                Some(*code)
            }
            _ => None,
        }
    }
}

/// Result type alias using FtpError
pub type Result<T> = std::result::Result<T, FtpError>;
