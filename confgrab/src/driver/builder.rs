//! Builder for session configuration.

use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;

use crate::error::{DriverError, Result};
use crate::transport::{HostKeyVerification, SessionConfig, TransportMode};

/// Builder for constructing a [`SessionConfig`].
///
/// # Example
///
/// ```rust
/// use std::time::Duration;
/// use confgrab::{SessionBuilder, TransportMode};
///
/// # fn example() -> Result<(), confgrab::Error> {
/// let config = SessionBuilder::new("192.168.1.1")
///     .username("admin")
///     .password("secret")
///     .enable_password("enable-secret")
///     .mode(TransportMode::Ssh)
///     .timeout(Duration::from_secs(25))
///     .build()?;
/// assert_eq!(config.port, 22);
/// # Ok(())
/// # }
/// ```
pub struct SessionBuilder {
    host: String,
    port: Option<u16>,
    username: Option<String>,
    password: String,
    enable_password: String,
    mode: TransportMode,
    timeout: Duration,
    critical_time: Duration,
    verify_privilege: bool,
    host_key_verification: HostKeyVerification,
    known_hosts_path: Option<PathBuf>,
    terminal_width: u32,
    terminal_height: u32,
    search_depth: usize,
}

impl SessionBuilder {
    /// Create a new builder for the specified host.
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port: None,
            username: None,
            password: String::new(),
            enable_password: String::new(),
            mode: TransportMode::Telnet,
            timeout: Duration::from_secs(25),
            critical_time: Duration::from_secs(60),
            verify_privilege: false,
            host_key_verification: HostKeyVerification::default(),
            known_hosts_path: None,
            terminal_width: 511,
            terminal_height: 24,
            search_depth: 1000,
        }
    }

    /// Set the port (default: 23 for telnet, 22 for SSH).
    pub fn port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    /// Set the username for login.
    pub fn username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    /// Set the login password.
    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.password = password.into();
        self
    }

    /// Set the password sent after the privilege escalation command.
    pub fn enable_password(mut self, password: impl Into<String>) -> Self {
        self.enable_password = password.into();
        self
    }

    /// Set the transport.
    pub fn mode(mut self, mode: TransportMode) -> Self {
        self.mode = mode;
        self
    }

    /// Set the connect timeout, also used as the deadline of every prompt wait.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the critical response time reported to monitoring.
    pub fn critical_time(mut self, critical_time: Duration) -> Self {
        self.critical_time = critical_time;
        self
    }

    /// Require the privileged prompt after escalation.
    pub fn verify_privilege(mut self, verify: bool) -> Self {
        self.verify_privilege = verify;
        self
    }

    /// Set the SSH host key verification mode.
    pub fn host_key_verification(mut self, mode: HostKeyVerification) -> Self {
        self.host_key_verification = mode;
        self
    }

    /// Use a specific known_hosts file.
    pub fn known_hosts_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.known_hosts_path = Some(path.into());
        self
    }

    /// Set terminal dimensions for the SSH PTY.
    pub fn terminal_size(mut self, width: u32, height: u32) -> Self {
        self.terminal_width = width;
        self.terminal_height = height;
        self
    }

    /// Set how many trailing bytes are searched for a prompt.
    pub fn search_depth(mut self, depth: usize) -> Self {
        self.search_depth = depth;
        self
    }

    /// Build the configuration.
    pub fn build(self) -> Result<SessionConfig> {
        if self.host.trim().is_empty() {
            return Err(invalid("host must not be empty"));
        }

        let username = match self.username {
            Some(username) if !username.is_empty() => username,
            _ => return Err(invalid("username is required")),
        };

        if self.timeout.is_zero() {
            return Err(invalid("timeout must be greater than zero"));
        }

        Ok(SessionConfig {
            port: self.port.unwrap_or_else(|| self.mode.default_port()),
            host: self.host,
            username,
            password: SecretString::from(self.password),
            enable_password: SecretString::from(self.enable_password),
            mode: self.mode,
            timeout: self.timeout,
            critical_time: self.critical_time,
            verify_privilege: self.verify_privilege,
            host_key_verification: self.host_key_verification,
            known_hosts_path: self.known_hosts_path,
            terminal_width: self.terminal_width,
            terminal_height: self.terminal_height,
            search_depth: self.search_depth,
        })
    }
}

fn invalid(message: &str) -> crate::error::Error {
    DriverError::InvalidConfig {
        message: message.to_string(),
    }
    .into()
}
