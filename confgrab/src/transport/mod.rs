//! Transport layer: telnet and SSH behind one interface.
//!
//! The driver only ever sees [`Transport`]: send a line, read until a
//! pattern, close. Which wire protocol carries the session is decided once,
//! by the [`Connector`], when the session is opened.

pub mod config;
mod negotiation;
mod ssh;
mod telnet;

pub use config::{HostKeyVerification, SessionConfig, TransportMode};
pub use ssh::SshTransport;
pub use telnet::TelnetTransport;

use std::future::Future;
use std::time::Duration;

use regex::bytes::Regex;

use crate::channel::ReadResult;
use crate::error::Result;
use crate::platform::VendorProfile;

/// A live, logged-in CLI session.
pub trait Transport: Send {
    /// Send one line of text followed by the transport's line ending.
    fn send_line(&mut self, text: &str) -> impl Future<Output = Result<()>> + Send;

    /// Accumulate output until `pattern` matches, or fail after `timeout`.
    fn read_until(
        &mut self,
        pattern: &Regex,
        timeout: Duration,
    ) -> impl Future<Output = Result<ReadResult>> + Send;

    /// Tear the session down. Safe to call more than once; never fails.
    fn close(&mut self) -> impl Future<Output = ()> + Send;
}

/// Opens sessions.
///
/// Connecting includes authentication: SSH authenticates in the handshake,
/// telnet runs the login prompt exchange. Either way the returned session
/// is sitting at the device's first operational prompt.
pub trait Connector: Send + Sync {
    type Transport: Transport;

    fn connect(
        &self,
        config: &SessionConfig,
        profile: &VendorProfile,
    ) -> impl Future<Output = Result<Self::Transport>> + Send;
}

/// A session over either transport.
pub enum Session {
    Telnet(TelnetTransport),
    Ssh(SshTransport),
}

impl Transport for Session {
    async fn send_line(&mut self, text: &str) -> Result<()> {
        match self {
            Session::Telnet(t) => t.send_line(text).await,
            Session::Ssh(t) => t.send_line(text).await,
        }
    }

    async fn read_until(&mut self, pattern: &Regex, timeout: Duration) -> Result<ReadResult> {
        match self {
            Session::Telnet(t) => t.read_until(pattern, timeout).await,
            Session::Ssh(t) => t.read_until(pattern, timeout).await,
        }
    }

    async fn close(&mut self) {
        match self {
            Session::Telnet(t) => t.close().await,
            Session::Ssh(t) => t.close().await,
        }
    }
}

/// Connects over the network using the mode in [`SessionConfig`].
#[derive(Debug, Clone, Copy, Default)]
pub struct NetworkConnector;

impl Connector for NetworkConnector {
    type Transport = Session;

    async fn connect(&self, config: &SessionConfig, profile: &VendorProfile) -> Result<Session> {
        match config.mode {
            TransportMode::Telnet => TelnetTransport::connect(config, profile)
                .await
                .map(Session::Telnet),
            TransportMode::Ssh => SshTransport::connect(config, profile)
                .await
                .map(Session::Ssh),
        }
    }
}
