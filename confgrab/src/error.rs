//! Error types for confgrab.

use std::io;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Main error type for confgrab operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Transport-level errors (TCP, SSH handshake, authentication)
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// Channel operation errors
    #[error("Channel error: {0}")]
    Channel(#[from] ChannelError),

    /// Driver-level errors
    #[error("Driver error: {0}")]
    Driver(#[from] DriverError),

    /// Platform/vendor errors
    #[error("Platform error: {0}")]
    Platform(#[from] PlatformError),

    /// Failed to write the captured configuration to disk
    #[error("Failed to write {path}: {source}")]
    Archive {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Transport layer errors (connection setup, authentication).
#[derive(Error, Debug)]
pub enum TransportError {
    /// Failed to connect to host
    #[error("Connection failed to {host}:{port}: {source}")]
    ConnectionFailed {
        host: String,
        port: u16,
        #[source]
        source: io::Error,
    },

    /// SSH handshake or protocol error
    #[error("SSH error: {0}")]
    Ssh(#[from] russh::Error),

    /// Authentication failed
    #[error("Authentication failed for user '{user}'")]
    AuthenticationFailed { user: String },

    /// Host is not present in known_hosts and verification is strict
    #[error("Host key for {host}:{port} is not in known_hosts")]
    HostKeyUnknown { host: String, port: u16 },

    /// Host key differs from the one recorded in known_hosts
    #[error("Host key for {host}:{port} changed (known_hosts line {line})")]
    HostKeyChanged { host: String, port: u16, line: usize },

    /// known_hosts could not be read or written
    #[error("known_hosts error: {0}")]
    KnownHosts(String),

    /// Connection setup timed out
    #[error("Connection timed out after {0:?}")]
    Timeout(Duration),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Channel layer errors (pattern matching, reads and writes on a live session).
#[derive(Error, Debug)]
pub enum ChannelError {
    /// Failed to open PTY channel
    #[error("Failed to open PTY channel: {0}")]
    PtyOpenFailed(russh::Error),

    /// Failed to request shell
    #[error("Failed to request shell: {0}")]
    ShellRequestFailed(russh::Error),

    /// Pattern matching timed out
    #[error("Pattern not found within {0:?}")]
    PatternTimeout(Duration),

    /// Peer closed the session
    #[error("Channel closed")]
    Closed,

    /// Reading from the session failed
    #[error("Read failed: {0}")]
    Read(#[source] io::Error),

    /// Writing to the session failed
    #[error("Write failed: {0}")]
    Write(#[source] io::Error),

    /// Sending data over the SSH channel failed
    #[error("Channel send failed: {0}")]
    Send(russh::Error),

    /// Invalid regex pattern
    #[error("Invalid regex pattern: {0}")]
    InvalidPattern(#[from] regex::Error),
}

/// Driver layer errors (privilege escalation, capture validation).
#[derive(Error, Debug)]
pub enum DriverError {
    /// The prompt after escalation is not the privileged prompt
    #[error("Failed to acquire privileged mode, device prompt is '{prompt}'")]
    PrivilegeAcquisitionFailed { prompt: String },

    /// Device answered with one of the profile's failure strings
    #[error("Command '{command}' failed: {message}")]
    CommandFailed { command: String, message: String },

    /// Capture produced no text
    #[error("Command '{command}' returned no output")]
    EmptyCapture { command: String },

    /// Invalid session configuration
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },
}

/// Platform/vendor definition errors.
#[derive(Error, Debug)]
pub enum PlatformError {
    /// No profile registered under this name
    #[error("Unknown platform '{name}' (known: {known})")]
    UnknownPlatform { name: String, known: String },

    /// Invalid platform definition
    #[error("Invalid platform definition: {message}")]
    InvalidDefinition { message: String },

    /// A profile with this name is already registered
    #[error("Platform '{name}' is already registered")]
    AlreadyRegistered { name: String },
}

/// Result type alias using confgrab's Error.
pub type Result<T> = std::result::Result<T, Error>;
