//! RFC 959 Section 4.2 - Reply Format Tests
//!
//! These tests verify compliance with FTP reply requirements:
//! - A reply is a three-digit code followed by a space and text
//! - Multi-line replies open with "NNN-" and close with "NNN " (same code)
//! - Lines inside a multi-line reply may start with anything, digits included

use ftp_rs::commands::{closes_multiline, parse_reply_line};
use ftp_rs::{FtpError, FtpReply, read_reply};

// Single-line replies (RFC 959 §4.2)

#[test]
fn test_reply_code_and_text() {
    let line = parse_reply_line("200 Command okay.").unwrap();
    assert_eq!(line.code, 200);
    assert!(line.last);
    assert_eq!(line.text, "Command okay.");
}

#[test]
fn test_reply_code_classes() {
    let cases = [
        (FtpReply::new(150, "Opening"), "preliminary"),
        (FtpReply::new(226, "Closing"), "success"),
        (FtpReply::new(331, "Need password"), "intermediate"),
        (FtpReply::new(425, "Can't open"), "transient"),
        (FtpReply::new(550, "Unavailable"), "permanent"),
    ];

    for (reply, class) in cases {
        match class {
            "preliminary" => assert!(reply.is_preliminary(), "{}", reply),
            "success" => assert!(reply.is_success(), "{}", reply),
            "intermediate" => assert!(reply.is_intermediate(), "{}", reply),
            "transient" => {
                assert!(reply.is_transient_error(), "{}", reply);
                assert!(reply.is_error());
            }
            _ => {
                assert!(reply.is_error(), "{}", reply);
                assert!(!reply.is_transient_error());
            }
        }
    }
}

#[test]
fn test_reply_requires_three_digits() {
    assert!(parse_reply_line("20 short").is_err());
    assert!(parse_reply_line("abc text").is_err());
    assert!(parse_reply_line("2000 too long").is_err());
}

#[test]
fn test_reply_separator_must_be_space_or_hyphen() {
    assert!(parse_reply_line("220_ready").is_err());
    assert!(parse_reply_line("220-ready").is_ok());
    assert!(parse_reply_line("220 ready").is_ok());
}

// Multi-line replies (RFC 959 §4.2)

#[test]
fn test_multiline_closing_line_matches_code() {
    assert!(closes_multiline("230 Done", 230));
    assert!(!closes_multiline("230-Still going", 230));
    assert!(!closes_multiline("250 Other code", 230));
    assert!(!closes_multiline(" 230 indented", 230));
}

#[tokio::test]
async fn test_multiline_reply_rfc_example() {
    // Example from RFC 959 §4.2
    let mut input: &[u8] = b"123-First line\r\n\
        Second line\r\n  \
        234 A line beginning with numbers\r\n\
        123 The last line\r\n";

    let reply = read_reply(&mut input).await.unwrap();
    assert_eq!(reply.code, 123);
    assert_eq!(reply.message, "First line");
    assert_eq!(
        reply.lines,
        vec![
            "Second line",
            "  234 A line beginning with numbers",
            "The last line"
        ]
    );
    assert!(input.is_empty());
}

#[tokio::test]
async fn test_multiline_text_joins_lines() {
    let mut input: &[u8] = b"211-Features\r\n PASV\r\n211 End\r\n";
    let reply = read_reply(&mut input).await.unwrap();
    assert_eq!(reply.text(), "Features\n PASV\nEnd");
}

#[tokio::test]
async fn test_reply_followed_by_next_reply() {
    let mut input: &[u8] = b"220-Hello\r\n220 Ready\r\n331 Password required\r\n";
    let greeting = read_reply(&mut input).await.unwrap();
    let next = read_reply(&mut input).await.unwrap();
    assert_eq!(greeting.code, 220);
    assert_eq!(next.code, 331);
}

#[tokio::test]
async fn test_truncated_reply_is_connection_closed() {
    let mut input: &[u8] = b"220-Hello\r\n";
    let err = read_reply(&mut input).await.unwrap_err();
    assert!(matches!(err, FtpError::ConnectionClosed));
}

#[tokio::test]
async fn test_non_utf8_reply_text() {
    let mut input: &[u8] = b"257 \"/caf\xe9\" created\r\n";
    let reply = read_reply(&mut input).await.unwrap();
    assert_eq!(reply.code, 257);
    assert!(reply.message.starts_with("\"/caf"));
}
