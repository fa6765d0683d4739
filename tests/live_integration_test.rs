//! Live integration tests against a real FTP server
//!
//! These tests are disabled by default. Enable with:
//! ```
//! cargo test --features live-tests -- --test-threads=1
//! ```
//!
//! Required environment variables:
//! - FTP_HOST: FTP server hostname
//! - FTP_PORT: Control port (default: 21)
//! - FTP_USER: Username
//! - FTP_PASS: Password
//! - FTP_DIR: Writable scratch directory (default: current directory)

#![cfg(feature = "live-tests")]

use ftp_rs::{FtpClient, FtpError, ServerConfig};
use std::sync::Arc;

fn get_test_config() -> ServerConfig {
    let host = std::env::var("FTP_HOST").expect("FTP_HOST not set");
    let port = std::env::var("FTP_PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(21);
    let username = std::env::var("FTP_USER").expect("FTP_USER not set");
    let password = std::env::var("FTP_PASS").expect("FTP_PASS not set");

    ServerConfig::new(host, port, username, password)
}

async fn connected_client() -> FtpClient {
    let mut client = FtpClient::connect(Arc::new(get_test_config()))
        .await
        .unwrap();
    client.authenticate().await.unwrap();
    if let Ok(dir) = std::env::var("FTP_DIR") {
        client.change_directory(&dir).await.unwrap();
    }
    client
}

fn scratch_name(label: &str) -> String {
    format!("ftp-rs-{}-{}", label, std::process::id())
}

#[tokio::test]
async fn test_live_connect_and_login() {
    let client = connected_client().await;
    assert!(client.is_authenticated());
    assert_eq!(client.welcome().code, 220);
}

#[tokio::test]
async fn test_live_list_directory() {
    let mut client = connected_client().await;
    let listing = client.list_directory(None).await.unwrap();
    println!("{}", listing.text);
    assert!(listing.exchange.terminal().is_success());
    client.logout().await.unwrap();
}

#[tokio::test]
async fn test_live_upload_download_delete() {
    let mut client = connected_client().await;
    let name = scratch_name("file");
    let payload: Vec<u8> = (0..10_000u32).map(|i| (i % 256) as u8).collect();

    let mut source: &[u8] = &payload;
    let summary = client.upload(&name, &mut source).await.unwrap();
    assert_eq!(summary.bytes, payload.len() as u64);

    let mut sink = Vec::new();
    client.download(&name, &mut sink).await.unwrap();
    assert_eq!(sink, payload);

    client.delete_file(&name).await.unwrap();

    let mut sink = Vec::new();
    let err = client.download(&name, &mut sink).await.unwrap_err();
    assert!(matches!(err, FtpError::OperationRejected { .. }), "{:?}", err);

    client.logout().await.unwrap();
}

#[tokio::test]
async fn test_live_make_and_remove_directory() {
    let mut client = connected_client().await;
    let name = scratch_name("dir");

    client.make_directory(&name).await.unwrap();
    client.change_directory(&name).await.unwrap();
    client.change_directory("..").await.unwrap();
    client.remove_directory(&name).await.unwrap();

    client.logout().await.unwrap();
}

#[tokio::test]
async fn test_live_wrong_password() {
    let config = get_test_config();
    let mut client = FtpClient::connect(Arc::new(config.clone())).await.unwrap();
    let err = client
        .login(&config.username, "definitely-not-the-password")
        .await
        .unwrap_err();
    assert!(matches!(err, FtpError::LoginRejected { .. }), "{:?}", err);
    assert!(client.is_closed());
}
