//! Outcome of one capture run.

use std::fmt;

use thiserror::Error;

use crate::error::{ChannelError, DriverError, Error};

/// Configuration text captured from a device.
///
/// The content is opaque: it is whatever the device printed between the
/// echoed display command and the next prompt, with CRLF folded to LF.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Capture {
    config: Vec<u8>,
}

impl Capture {
    /// Wrap captured bytes.
    pub fn new(config: impl Into<Vec<u8>>) -> Self {
        Self {
            config: config.into(),
        }
    }

    /// The captured bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.config
    }

    /// Size of the capture in bytes.
    pub fn len(&self) -> usize {
        self.config.len()
    }

    /// Check if nothing was captured.
    pub fn is_empty(&self) -> bool {
        self.config.is_empty()
    }

    /// Get the capture as a string (lossy UTF-8).
    pub fn as_str_lossy(&self) -> std::borrow::Cow<'_, str> {
        String::from_utf8_lossy(&self.config)
    }

    /// Take ownership of the captured bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.config
    }
}

/// Category of a failed run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Host unreachable, refused, or authentication rejected by the transport.
    Connect,
    /// No matching prompt within the deadline.
    Timeout,
    /// Reading from the session failed or the peer hung up.
    Read,
    /// Writing to the session failed.
    Write,
    /// The display command produced no text.
    EmptyCapture,
    /// The device answered with one of its error strings.
    CommandRejected,
    /// Verified escalation did not reach the privileged prompt.
    Privilege,
    /// Unknown OS tag or broken vendor profile.
    Platform,
    /// Invalid session configuration.
    Config,
    /// The capture could not be written to disk.
    Archive,
}

impl FailureKind {
    /// Classify an error.
    pub fn of(error: &Error) -> Self {
        match error {
            Error::Transport(_) => FailureKind::Connect,
            Error::Channel(e) => match e {
                ChannelError::PatternTimeout(_) => FailureKind::Timeout,
                ChannelError::Closed | ChannelError::Read(_) => FailureKind::Read,
                ChannelError::Write(_) | ChannelError::Send(_) => FailureKind::Write,
                ChannelError::PtyOpenFailed(_) | ChannelError::ShellRequestFailed(_) => {
                    FailureKind::Connect
                }
                ChannelError::InvalidPattern(_) => FailureKind::Platform,
            },
            Error::Driver(e) => match e {
                DriverError::PrivilegeAcquisitionFailed { .. } => FailureKind::Privilege,
                DriverError::CommandFailed { .. } => FailureKind::CommandRejected,
                DriverError::EmptyCapture { .. } => FailureKind::EmptyCapture,
                DriverError::InvalidConfig { .. } => FailureKind::Config,
            },
            Error::Platform(_) => FailureKind::Platform,
            Error::Archive { .. } => FailureKind::Archive,
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FailureKind::Connect => "connect",
            FailureKind::Timeout => "timeout",
            FailureKind::Read => "read",
            FailureKind::Write => "write",
            FailureKind::EmptyCapture => "empty capture",
            FailureKind::CommandRejected => "command rejected",
            FailureKind::Privilege => "privilege",
            FailureKind::Platform => "platform",
            FailureKind::Config => "config",
            FailureKind::Archive => "archive",
        };
        f.write_str(name)
    }
}

/// Why a run produced no capture.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{kind}: {message}")]
pub struct CaptureFailure {
    pub kind: FailureKind,
    pub message: String,
}

impl CaptureFailure {
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl From<&Error> for CaptureFailure {
    fn from(error: &Error) -> Self {
        Self::new(FailureKind::of(error), error.to_string())
    }
}

impl From<Error> for CaptureFailure {
    fn from(error: Error) -> Self {
        Self::from(&error)
    }
}

/// Result of one capture run; produced once, consumed by the reporter.
pub type CaptureResult = std::result::Result<Capture, CaptureFailure>;
