//! FTP command builders and reply parsers

use crate::error::{FtpError, Result};

// Module declarations
pub mod pasv;
pub mod response;

// Re-export all public items
pub use pasv::*;
pub use response::*;

// Authentication

/// Build USER command
pub fn user(username: &str) -> String {
    format!("USER {}\r\n", username)
}

/// Build PASS command
pub fn pass(password: &str) -> String {
    format!("PASS {}\r\n", password)
}

// Passive mode and transfers

/// Build PASV command (RFC 959 §4.1.1)
///
/// Asks the server to listen on a data port and report it in a 227 reply.
pub fn pasv() -> &'static str {
    "PASV\r\n"
}

/// Build LIST command
///
/// Without a pattern the client asks for `*`, the whole working directory.
pub fn list(pattern: Option<&str>) -> String {
    format!("LIST {}\r\n", pattern.unwrap_or("*"))
}

/// Build RETR command
pub fn retr(path: &str) -> String {
    format!("RETR {}\r\n", path)
}

/// Build STOR command
pub fn stor(path: &str) -> String {
    format!("STOR {}\r\n", path)
}

// File and directory management

/// Build CWD command
pub fn cwd(path: &str) -> String {
    format!("CWD {}\r\n", path)
}

/// Build MKD command
pub fn mkd(path: &str) -> String {
    format!("MKD {}\r\n", path)
}

/// Build RMD command
pub fn rmd(path: &str) -> String {
    format!("RMD {}\r\n", path)
}

/// Build DELE command
pub fn dele(path: &str) -> String {
    format!("DELE {}\r\n", path)
}

// Connection control

/// Build QUIT command
pub fn quit() -> &'static str {
    "QUIT\r\n"
}

/// Check that a built command is exactly one line
///
/// An argument carrying CR or LF would put a second command on the wire
/// that no reply read accounts for.
pub fn validate(command: &str) -> Result<()> {
    let body = command.strip_suffix("\r\n").unwrap_or(command);
    if body.contains(['\r', '\n']) {
        return Err(FtpError::InvalidArgument(format!(
            "line break in command: {}",
            redact(body).escape_debug()
        )));
    }
    Ok(())
}

/// Render a command for logs, hiding the PASS argument
pub fn redact(command: &str) -> &str {
    let command = command.trim_end();
    if command
        .get(..5)
        .is_some_and(|verb| verb.eq_ignore_ascii_case("PASS "))
    {
        "PASS ****"
    } else {
        command
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_argument_commands() {
        assert_eq!(user("anonymous"), "USER anonymous\r\n");
        assert_eq!(pass("secret"), "PASS secret\r\n");
        assert_eq!(cwd("/pub"), "CWD /pub\r\n");
        assert_eq!(mkd("new dir"), "MKD new dir\r\n");
        assert_eq!(rmd("old"), "RMD old\r\n");
        assert_eq!(retr("file.bin"), "RETR file.bin\r\n");
        assert_eq!(stor("file.bin"), "STOR file.bin\r\n");
        assert_eq!(dele("file.bin"), "DELE file.bin\r\n");
    }

    #[test]
    fn test_bare_commands() {
        assert_eq!(pasv(), "PASV\r\n");
        assert_eq!(quit(), "QUIT\r\n");
    }

    #[test]
    fn test_list_default_pattern() {
        assert_eq!(list(None), "LIST *\r\n");
        assert_eq!(list(Some("*.txt")), "LIST *.txt\r\n");
    }

    #[test]
    fn test_validate_single_line() {
        assert!(validate(&cwd("/pub")).is_ok());
        assert!(validate(pasv()).is_ok());
        assert!(validate(&list(None)).is_ok());
    }

    #[test]
    fn test_validate_rejects_embedded_line_breaks() {
        for command in [
            cwd("/pub\r\nCWD /missing"),
            dele("a\nDELE b"),
            retr("file\r"),
            user("bob\r\nPASS x"),
        ] {
            let err = validate(&command).unwrap_err();
            assert!(matches!(err, FtpError::InvalidArgument(_)), "{:?}", command);
        }
    }

    #[test]
    fn test_validate_hides_password() {
        let err = validate(&pass("hunter2\r\nQUIT")).unwrap_err();
        assert!(!err.to_string().contains("hunter2"));
    }

    #[test]
    fn test_redact() {
        assert_eq!(redact("PASS hunter2\r\n"), "PASS ****");
        assert_eq!(redact("pass hunter2\r\n"), "PASS ****");
        assert_eq!(redact("USER bob\r\n"), "USER bob");
        assert_eq!(redact("PASV\r\n"), "PASV");
    }
}
