//! PASV reply parsing (RFC 959 §4.1.1, reply 227)

use crate::error::{FtpError, Result};
use crate::response::FtpReply;
use lazy_static::lazy_static;
use regex::Regex;
use std::net::{Ipv4Addr, SocketAddrV4};

lazy_static! {
    // 227 Entering Passive Mode (h1,h2,h3,h4,p1,p2).
    static ref PASV_TUPLE_RE: Regex = Regex::new(
        r"\(\s*(\d{1,3})\s*,\s*(\d{1,3})\s*,\s*(\d{1,3})\s*,\s*(\d{1,3})\s*,\s*(\d{1,3})\s*,\s*(\d{1,3})\s*\)"
    )
    .expect("PASV regex is valid");
}

/// Extract the data connection address from a 227 reply
///
/// Looks for the first parenthesized `(h1,h2,h3,h4,p1,p2)` group. The address
/// is `h1.h2.h3.h4` and the port `p1 * 256 + p2`. Every number must fit in
/// an octet.
///
/// # Errors
///
/// [`FtpError::MalformedPassiveReply`] when no six-number group is present
/// or a number exceeds 255.
pub fn parse_pasv_reply(reply: &FtpReply) -> Result<SocketAddrV4> {
    parse_pasv_text(&reply.text())
}

/// Same as [`parse_pasv_reply`] on raw reply text
pub fn parse_pasv_text(text: &str) -> Result<SocketAddrV4> {
    let malformed = || FtpError::MalformedPassiveReply(text.chars().take(100).collect());

    let caps = PASV_TUPLE_RE.captures(text).ok_or_else(malformed)?;

    let mut octets = [0u8; 6];
    for (slot, group) in octets.iter_mut().zip(1..=6) {
        *slot = caps[group].parse::<u8>().map_err(|_| malformed())?;
    }

    let ip = Ipv4Addr::new(octets[0], octets[1], octets[2], octets[3]);
    let port = u16::from(octets[4]) * 256 + u16::from(octets[5]);
    Ok(SocketAddrV4::new(ip, port))
}
