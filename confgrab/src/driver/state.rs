//! Logical states of a device session.

use std::fmt;

/// Where a [`SessionDriver`](super::SessionDriver) is in the capture sequence.
///
/// ```text
/// Disconnected → Authenticating → Privileged → PaginationSuppressed
///              → Capturing → Disconnecting → Closed
/// ```
///
/// Any failure after `Authenticating` jumps to `Disconnecting`; a failed
/// connect goes straight to `Closed`. `Closed` is always the final state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    Disconnected,
    Authenticating,
    Privileged,
    PaginationSuppressed,
    Capturing,
    Disconnecting,
    Closed,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SessionState::Disconnected => "disconnected",
            SessionState::Authenticating => "authenticating",
            SessionState::Privileged => "privileged",
            SessionState::PaginationSuppressed => "pagination-suppressed",
            SessionState::Capturing => "capturing",
            SessionState::Disconnecting => "disconnecting",
            SessionState::Closed => "closed",
        };
        f.write_str(name)
    }
}
