//! RFC 959 Section 4.1.1 - PASV Reply Tests
//!
//! The 227 reply carries the data port as six comma-separated decimal
//! numbers: h1,h2,h3,h4 (host) and p1,p2 (port = p1 * 256 + p2).

use ftp_rs::commands::{parse_pasv_reply, parse_pasv_text};
use ftp_rs::{FtpError, FtpReply};
use std::net::{Ipv4Addr, SocketAddrV4};

#[test]
fn test_pasv_standard_reply() {
    let reply = FtpReply::new(227, "Entering Passive Mode (192,168,1,10,19,136).");
    let addr = parse_pasv_reply(&reply).unwrap();
    assert_eq!(addr, SocketAddrV4::new(Ipv4Addr::new(192, 168, 1, 10), 5000));
}

#[test]
fn test_pasv_port_arithmetic() {
    let cases = [
        ("(10,0,0,1,0,21)", 21),
        ("(10,0,0,1,1,0)", 256),
        ("(10,0,0,1,255,255)", 65535),
        ("(10,0,0,1,4,1)", 1025),
    ];

    for (text, port) in cases {
        let addr = parse_pasv_text(text).unwrap();
        assert_eq!(addr.port(), port, "Failed for {}", text);
    }
}

#[test]
fn test_pasv_tuple_anywhere_in_text() {
    // Servers word the 227 text differently; only the tuple matters
    let addr = parse_pasv_text("=(127,0,0,1,200,10) ok").unwrap();
    assert_eq!(addr.ip(), &Ipv4Addr::LOCALHOST);
    assert_eq!(addr.port(), 200 * 256 + 10);
}

#[test]
fn test_pasv_rejects_short_tuple() {
    let err = parse_pasv_text("Entering Passive Mode (127,0,0,1,19)").unwrap_err();
    assert!(matches!(err, FtpError::MalformedPassiveReply(_)));
}

#[test]
fn test_pasv_rejects_octet_overflow() {
    let err = parse_pasv_text("Entering Passive Mode (256,0,0,1,19,136)").unwrap_err();
    assert!(matches!(err, FtpError::MalformedPassiveReply(_)));
}

#[test]
fn test_pasv_rejects_missing_tuple() {
    let reply = FtpReply::new(227, "Entering Passive Mode");
    let err = parse_pasv_reply(&reply).unwrap_err();
    assert!(matches!(err, FtpError::MalformedPassiveReply(_)));
    assert!(!err.is_session_fatal());
}
