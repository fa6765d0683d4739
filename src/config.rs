//! FTP server configuration

use std::time::Duration;

/// Default TCP connect deadline (control and data connections)
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(120);

/// Default deadline for a single control reply
const DEFAULT_REPLY_TIMEOUT: Duration = Duration::from_secs(60);

/// Default deadline for a single read or write on the data connection
const DEFAULT_DATA_TIMEOUT: Duration = Duration::from_secs(180);

/// Default transfer chunk size in bytes
pub const DEFAULT_CHUNK_SIZE: usize = 1024;

/// Deadlines applied to every blocking step of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Timeouts {
    /// TCP connect, for both the control and the passive data connection
    pub connect: Duration,
    /// Waiting for one complete reply on the control connection
    pub reply: Duration,
    /// One read or write on the data connection
    pub data: Duration,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            connect: DEFAULT_CONNECT_TIMEOUT,
            reply: DEFAULT_REPLY_TIMEOUT,
            data: DEFAULT_DATA_TIMEOUT,
        }
    }
}

impl Timeouts {
    /// Use the same deadline for every step
    pub fn uniform(limit: Duration) -> Self {
        Self {
            connect: limit,
            reply: limit,
            data: limit,
        }
    }
}

/// FTP server configuration
///
/// Contains everything needed to connect and log in to an FTP server.
///
/// # Example
///
/// ```
/// use ftp_rs::ServerConfig;
///
/// // Recommended: use the constructor methods
/// let config = ServerConfig::standard("ftp.example.com", "user", "pass");
///
/// // Or construct manually
/// let config = ServerConfig {
///     host: "ftp.example.com".to_string(),
///     port: 21,
///     username: "user".to_string(),
///     password: "pass".to_string(),
///     timeouts: Default::default(),
///     chunk_size: 1024,
/// };
/// ```
#[must_use]
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ServerConfig {
    /// Server hostname (e.g., "ftp.example.com")
    pub host: String,

    /// Control connection port (typically 21)
    pub port: u16,

    /// Username for [`authenticate`](crate::FtpClient::authenticate)
    pub username: String,

    /// Password for [`authenticate`](crate::FtpClient::authenticate)
    pub password: String,

    /// Connect, reply and data deadlines
    #[cfg_attr(feature = "serde", serde(default))]
    pub timeouts: Timeouts,

    /// Size of each read/write when streaming file bytes
    #[cfg_attr(feature = "serde", serde(default = "default_chunk_size"))]
    pub chunk_size: usize,
}

#[cfg(feature = "serde")]
fn default_chunk_size() -> usize {
    DEFAULT_CHUNK_SIZE
}

impl ServerConfig {
    /// Create a new server configuration
    ///
    /// # Arguments
    ///
    /// * `host` - Server hostname
    /// * `port` - Control connection port
    /// * `username` - Login username
    /// * `password` - Login password
    pub fn new(
        host: impl Into<String>,
        port: u16,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            host: host.into(),
            port,
            username: username.into(),
            password: password.into(),
            timeouts: Timeouts::default(),
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }

    /// Create a configuration for the standard control port (21)
    ///
    /// **Warning:** FTP transmits credentials in clear text.
    pub fn standard(
        host: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self::new(host, 21, username, password)
    }

    /// Create an anonymous login configuration on port 21
    pub fn anonymous(host: impl Into<String>) -> Self {
        Self::standard(host, "anonymous", "anonymous@")
    }

    /// Replace the session deadlines
    pub fn with_timeouts(mut self, timeouts: Timeouts) -> Self {
        self.timeouts = timeouts;
        self
    }

    /// Replace the transfer chunk size (clamped to at least one byte)
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new() {
        let config = ServerConfig::new("ftp.example.com", 2121, "user", "pass");
        assert_eq!(config.host, "ftp.example.com");
        assert_eq!(config.port, 2121);
        assert_eq!(config.username, "user");
        assert_eq!(config.password, "pass");
        assert_eq!(config.chunk_size, DEFAULT_CHUNK_SIZE);
        assert_eq!(config.timeouts, Timeouts::default());
    }

    #[test]
    fn test_standard_helper() {
        let config = ServerConfig::standard("ftp.example.com", "user", "pass");
        assert_eq!(config.port, 21);
        assert_eq!(config.username, "user");
    }

    #[test]
    fn test_anonymous_helper() {
        let config = ServerConfig::anonymous("ftp.example.com");
        assert_eq!(config.port, 21);
        assert_eq!(config.username, "anonymous");
        assert_eq!(config.password, "anonymous@");
    }

    #[test]
    fn test_default_timeouts() {
        let timeouts = Timeouts::default();
        assert_eq!(timeouts.connect, Duration::from_secs(120));
        assert_eq!(timeouts.reply, Duration::from_secs(60));
        assert_eq!(timeouts.data, Duration::from_secs(180));
    }

    #[test]
    fn test_builders() {
        let config = ServerConfig::anonymous("localhost")
            .with_timeouts(Timeouts::uniform(Duration::from_secs(5)))
            .with_chunk_size(0);
        assert_eq!(config.timeouts.reply, Duration::from_secs(5));
        assert_eq!(config.timeouts.data, Duration::from_secs(5));
        assert_eq!(config.chunk_size, 1, "Chunk size is clamped to one byte");
    }
}
