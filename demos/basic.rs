//! Basic FTP client example
//!
//! Run with: cargo run --example basic

use ftp_rs::{FtpClient, ServerConfig};
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    // Configure the FTP server
    // Replace with your actual server credentials
    let config = ServerConfig::new(
        std::env::var("FTP_HOST").unwrap_or_else(|_| "ftp.example.com".to_string()),
        std::env::var("FTP_PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(21),
        std::env::var("FTP_USER").unwrap_or_else(|_| "anonymous".to_string()),
        std::env::var("FTP_PASS").unwrap_or_else(|_| "anonymous@".to_string()),
    );

    println!("Connecting to {}:{}...", config.host, config.port);

    // Connect to the server
    let mut client = FtpClient::connect(Arc::new(config)).await?;
    println!("Connected: {}", client.welcome());

    // Authenticate
    client.authenticate().await?;
    println!("Authenticated!");

    if let Ok(dir) = std::env::var("FTP_DIR") {
        let exchange = client.change_directory(&dir).await?;
        for reply in exchange.replies() {
            println!("< {}", reply);
        }
    }

    // List the working directory
    let listing = client.list_directory(None).await?;
    for reply in listing.exchange.replies() {
        println!("< {}", reply);
    }
    println!("\nDirectory listing:");
    for entry in listing.lines() {
        println!("  {}", entry);
    }

    // Download a file if one was named
    if let Ok(remote) = std::env::var("FTP_FILE") {
        let mut contents = Vec::new();
        let summary = client.download(&remote, &mut contents).await?;
        println!("\nDownloaded {} ({} bytes)", remote, summary.bytes);
    }

    // Say goodbye
    client.logout().await?;
    println!("\nDisconnected");

    Ok(())
}
