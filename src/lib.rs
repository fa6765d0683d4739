#![doc = include_str!("../README.md")]

mod client;
/// FTP command builders and reply-line parsers
pub mod commands;
mod config;
mod error;
mod response;

pub use client::{DataConnection, DirectoryListing, FtpClient, TransferSummary, read_reply};
pub use config::{DEFAULT_CHUNK_SIZE, ServerConfig, Timeouts};
pub use error::{FtpError, Result};
pub use response::{Exchange, FtpReply, codes};
pub use tokio_util::sync::CancellationToken;
