//! Session configuration.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;

/// Which transport carries the CLI session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransportMode {
    /// Plain telnet; login happens over the text stream.
    #[default]
    Telnet,

    /// SSH; authentication happens in the SSH handshake.
    Ssh,
}

impl TransportMode {
    /// The well-known port for this transport.
    pub fn default_port(self) -> u16 {
        match self {
            TransportMode::Telnet => 23,
            TransportMode::Ssh => 22,
        }
    }
}

impl fmt::Display for TransportMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportMode::Telnet => f.write_str("telnet"),
            TransportMode::Ssh => f.write_str("ssh"),
        }
    }
}

/// Host key verification mode, analogous to OpenSSH's `StrictHostKeyChecking`.
#[derive(Debug, Clone, Default)]
pub enum HostKeyVerification {
    /// Reject unknown and changed keys. Connection fails if the host
    /// is not already in known_hosts.
    Strict,

    /// Accept and auto-learn unknown keys, but reject changed keys.
    #[default]
    AcceptNew,

    /// Accept all keys without checking. For testing and lab use only.
    Disabled,
}

/// Everything the session driver needs to reach and log into one device.
///
/// Built once by the caller (usually through
/// [`SessionBuilder`](crate::driver::SessionBuilder)) and only ever read
/// by the driver and transports.
#[derive(Debug)]
pub struct SessionConfig {
    /// Target host (hostname or IP address).
    pub host: String,

    /// TCP port.
    pub port: u16,

    /// Username for login.
    pub username: String,

    /// Login password.
    pub password: SecretString,

    /// Password sent after the privilege escalation command.
    pub enable_password: SecretString,

    /// Telnet or SSH.
    pub mode: TransportMode,

    /// Connect timeout; also the deadline for every prompt wait.
    pub timeout: Duration,

    /// Critical response time reported to monitoring. Does not affect the outcome.
    pub critical_time: Duration,

    /// Fail the run when the prompt after escalation is not the privileged one.
    pub verify_privilege: bool,

    /// Host key verification mode (SSH only).
    pub host_key_verification: HostKeyVerification,

    /// Path to known_hosts file (SSH only).
    pub known_hosts_path: Option<PathBuf>,

    /// Terminal width for the SSH PTY.
    pub terminal_width: u32,

    /// Terminal height for the SSH PTY.
    pub terminal_height: u32,

    /// How many trailing bytes are searched for a prompt.
    pub search_depth: usize,
}

impl SessionConfig {
    /// Get the socket address for connection.
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
