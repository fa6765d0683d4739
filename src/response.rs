//! FTP reply types and status codes

/// FTP reply: three-digit code, first-line text and any continuation lines
///
/// Single-line replies (`250 Okay`) have an empty `lines`. Multi-line replies
/// (`220-Welcome` ... `220 Ready`) keep the first line's text in `message`
/// and every following line, including the closing one, in `lines`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FtpReply {
    /// 3-digit FTP reply code
    pub code: u16,
    /// Text of the first reply line (without the code)
    pub message: String,
    /// Remaining lines of a multi-line reply
    pub lines: Vec<String>,
}

impl FtpReply {
    /// Create a single-line reply
    pub fn new(code: u16, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            lines: vec![],
        }
    }

    /// Whole reply text, lines joined with `\n`
    pub fn text(&self) -> String {
        if self.lines.is_empty() {
            return self.message.clone();
        }
        let mut text = self.message.clone();
        for line in &self.lines {
            text.push('\n');
            text.push_str(line);
        }
        text
    }

    /// Check if reply is a positive preliminary reply (1xx)
    pub fn is_preliminary(&self) -> bool {
        (100..200).contains(&self.code)
    }

    /// Check if reply indicates success (2xx)
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.code)
    }

    /// Check if reply asks for more information (3xx)
    pub fn is_intermediate(&self) -> bool {
        (300..400).contains(&self.code)
    }

    /// Check if reply indicates error (4xx or 5xx)
    pub fn is_error(&self) -> bool {
        self.code >= 400
    }

    /// Check if reply is a transient negative reply (4xx)
    pub fn is_transient_error(&self) -> bool {
        (400..500).contains(&self.code)
    }
}

impl std::fmt::Display for FtpReply {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.code, self.message)
    }
}

/// Every reply received for one operation, in arrival order
///
/// The last reply is the terminal one that decided the outcome. Operations
/// return the whole exchange so callers can report each reply, not just the
/// final status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exchange {
    intermediate: Vec<FtpReply>,
    terminal: FtpReply,
}

impl Exchange {
    /// Exchange consisting of a single terminal reply
    pub fn single(terminal: FtpReply) -> Self {
        Self {
            intermediate: vec![],
            terminal,
        }
    }

    /// Exchange with replies that preceded the terminal one
    pub fn new(intermediate: Vec<FtpReply>, terminal: FtpReply) -> Self {
        Self {
            intermediate,
            terminal,
        }
    }

    /// The reply that concluded the exchange
    pub fn terminal(&self) -> &FtpReply {
        &self.terminal
    }

    /// Replies received before the terminal one
    pub fn intermediate(&self) -> &[FtpReply] {
        &self.intermediate
    }

    /// All replies in arrival order
    pub fn replies(&self) -> impl Iterator<Item = &FtpReply> {
        self.intermediate
            .iter()
            .chain(std::iter::once(&self.terminal))
    }

    /// Number of replies in the exchange
    pub fn len(&self) -> usize {
        self.intermediate.len() + 1
    }

    /// Always false: an exchange holds at least its terminal reply
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Append a later exchange; its terminal reply becomes this one's
    pub(crate) fn extend(&mut self, later: Exchange) {
        let previous = std::mem::replace(&mut self.terminal, later.terminal);
        self.intermediate.push(previous);
        self.intermediate.extend(later.intermediate);
    }

    /// Consume the exchange, returning every reply in arrival order
    pub fn into_replies(self) -> Vec<FtpReply> {
        let mut replies = self.intermediate;
        replies.push(self.terminal);
        replies
    }
}

/// FTP reply codes (RFC 959 Section 4.2)
#[allow(dead_code)]
pub mod codes {
    // 1xx - Positive preliminary
    /// Restart marker reply
    pub const RESTART_MARKER: u16 = 110;
    /// Service ready in nnn minutes
    pub const SERVICE_READY_LATER: u16 = 120;
    /// Data connection already open; transfer starting
    pub const DATA_ALREADY_OPEN: u16 = 125;
    /// File status okay; about to open data connection
    pub const FILE_STATUS_OKAY: u16 = 150;

    // 2xx - Positive completion
    /// Command okay
    pub const COMMAND_OKAY: u16 = 200;
    /// Service ready for new user
    pub const SERVICE_READY: u16 = 220;
    /// Service closing control connection
    pub const CLOSING_CONTROL: u16 = 221;
    /// Closing data connection; requested file action successful
    pub const CLOSING_DATA: u16 = 226;
    /// Entering Passive Mode (h1,h2,h3,h4,p1,p2)
    pub const ENTERING_PASSIVE_MODE: u16 = 227;
    /// User logged in, proceed
    pub const LOGGED_IN: u16 = 230;
    /// Requested file action okay, completed
    pub const FILE_ACTION_OKAY: u16 = 250;
    /// "PATHNAME" created
    pub const PATHNAME_CREATED: u16 = 257;

    // 3xx - Positive intermediate
    /// User name okay, need password
    pub const NEED_PASSWORD: u16 = 331;
    /// Need account for login
    pub const NEED_ACCOUNT: u16 = 332;

    // 4xx - Transient negative completion
    /// Service not available, closing control connection
    pub const SERVICE_NOT_AVAILABLE: u16 = 421;
    /// Can't open data connection
    pub const CANNOT_OPEN_DATA: u16 = 425;
    /// Connection closed; transfer aborted
    pub const TRANSFER_ABORTED: u16 = 426;
    /// Requested action aborted: local error in processing
    pub const LOCAL_ERROR: u16 = 451;

    // 5xx - Permanent negative completion
    /// Syntax error, command unrecognized
    pub const SYNTAX_ERROR: u16 = 500;
    /// Command not implemented
    pub const NOT_IMPLEMENTED: u16 = 502;
    /// Bad sequence of commands
    pub const BAD_SEQUENCE: u16 = 503;
    /// Not logged in
    pub const NOT_LOGGED_IN: u16 = 530;
    /// Requested action not taken; file unavailable
    pub const ACTION_NOT_TAKEN: u16 = 550;
}
