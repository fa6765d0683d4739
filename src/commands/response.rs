//! Core FTP reply line parsing

use crate::error::{FtpError, Result};

/// One parsed line of an FTP reply
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplyLine {
    /// 3-digit reply code
    pub code: u16,
    /// `true` for `NNN text` (closes the reply), `false` for `NNN-text`
    pub last: bool,
    /// Text after the separator
    pub text: String,
}

fn invalid(line: &str) -> FtpError {
    FtpError::InvalidResponse(line.chars().take(100).collect())
}

/// Parse an FTP reply line into code, separator and text
///
/// Accepts `NNN text`, `NNN-text` and a bare `NNN`. Anything else, including
/// a longer numeric prefix such as `2000 text`, is an invalid reply.
pub fn parse_reply_line(line: &str) -> Result<ReplyLine> {
    // Strip UTF-8 BOM if present (some broken servers/proxies add it)
    let line = line.trim_start_matches('\u{FEFF}');
    let line = line.trim_end_matches(['\r', '\n']);

    let bytes = line.as_bytes();
    if bytes.len() < 3 || !bytes[..3].iter().all(u8::is_ascii_digit) {
        return Err(invalid(line));
    }

    // Safe to slice since we verified ASCII
    let code = line[0..3].parse::<u16>().map_err(|_| invalid(line))?;

    match bytes.get(3) {
        None => Ok(ReplyLine {
            code,
            last: true,
            text: String::new(),
        }),
        Some(b' ') => Ok(ReplyLine {
            code,
            last: true,
            text: line[4..].to_string(),
        }),
        Some(b'-') => Ok(ReplyLine {
            code,
            last: false,
            text: line[4..].to_string(),
        }),
        Some(_) => Err(invalid(line)),
    }
}

/// Whether `line` closes a multi-line reply opened with `code`
pub fn closes_multiline(line: &str, code: u16) -> bool {
    matches!(parse_reply_line(line), Ok(parsed) if parsed.last && parsed.code == code)
}
