//! Session state types for FTP client

/// FTP session state
///
/// `Disconnected` has no value here: a client only exists once the control
/// connection is up and the 220 greeting was received.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum SessionState {
    /// Control connection open, greeting received, not logged in
    Connected,
    /// Login accepted (230)
    Authenticated,
    /// Control connection closed; the session cannot be reused
    Closed,
}
