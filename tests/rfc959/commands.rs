//! RFC 959 Section 5.3 - Command Syntax Tests
//!
//! Commands are an upper-case verb, an optional argument separated by a
//! single space, and a CRLF terminator.

use ftp_rs::commands;

#[test]
fn test_every_command_ends_with_crlf() {
    let built = [
        commands::user("anonymous"),
        commands::pass("guest"),
        commands::pasv().to_string(),
        commands::list(None),
        commands::retr("a.bin"),
        commands::stor("a.bin"),
        commands::cwd("/pub"),
        commands::mkd("incoming"),
        commands::rmd("incoming"),
        commands::dele("a.bin"),
        commands::quit().to_string(),
    ];

    for command in &built {
        assert!(command.ends_with("\r\n"), "missing CRLF: {:?}", command);
        assert_eq!(
            command.matches("\r\n").count(),
            1,
            "exactly one terminator: {:?}",
            command
        );
    }
}

#[test]
fn test_verbs_are_four_letters_or_less() {
    // RFC 959 §5.3.1: command codes are 3 or 4 alphabetic characters
    let built = [
        commands::user("u"),
        commands::pass("p"),
        commands::cwd("d"),
        commands::mkd("d"),
        commands::rmd("d"),
        commands::dele("f"),
        commands::retr("f"),
        commands::stor("f"),
    ];

    for command in &built {
        let verb = command.split(' ').next().unwrap();
        assert!((3..=4).contains(&verb.len()), "verb {:?}", verb);
        assert!(verb.chars().all(|c| c.is_ascii_uppercase()));
    }
}

#[test]
fn test_single_space_separator() {
    assert_eq!(commands::cwd("/pub/linux"), "CWD /pub/linux\r\n");
    assert_eq!(commands::user("bob"), "USER bob\r\n");
}

#[test]
fn test_arguments_with_spaces_pass_through() {
    // RFC 959 §5.3.2: <pathname> is a <string>, spaces included
    assert_eq!(commands::retr("my file.txt"), "RETR my file.txt\r\n");
    assert_eq!(commands::mkd("new folder"), "MKD new folder\r\n");
}

#[test]
fn test_list_without_pattern_requests_everything() {
    assert_eq!(commands::list(None), "LIST *\r\n");
    assert_eq!(commands::list(Some("/pub")), "LIST /pub\r\n");
}

#[test]
fn test_password_never_logged() {
    assert_eq!(commands::redact(&commands::pass("s3cret")), "PASS ****");
    assert!(!commands::redact(&commands::pass("s3cret")).contains("s3cret"));
    assert_eq!(commands::redact(&commands::cwd("/pub")), "CWD /pub");
}
