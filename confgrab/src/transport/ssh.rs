//! SSH transport implementation using russh.

use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use log::{debug, trace, warn};
use regex::bytes::Regex;
use russh::client::{self, Handle, Msg};
use russh::keys::PublicKey;
use russh::{Channel, ChannelMsg};
use secrecy::ExposeSecret;

use super::Transport;
use super::config::{HostKeyVerification, SessionConfig};
use crate::channel::{ChunkSource, PromptReader, ReadResult};
use crate::error::{ChannelError, Result, TransportError};
use crate::platform::VendorProfile;

/// Interactive shell channel on an SSH connection.
struct ShellChannel {
    channel: Channel<Msg>,
}

impl ChunkSource for ShellChannel {
    async fn read_chunk(&mut self) -> Result<Vec<u8>> {
        loop {
            match self.channel.wait().await {
                Some(ChannelMsg::Data { ref data }) => return Ok(data.to_vec()),
                Some(ChannelMsg::ExtendedData { ref data, .. }) => return Ok(data.to_vec()),
                Some(ChannelMsg::Eof) | Some(ChannelMsg::Close) | None => {
                    return Err(ChannelError::Closed.into());
                }
                Some(_) => continue,
            }
        }
    }
}

/// SSH session to a device, with a PTY shell standing in for a telnet line.
pub struct SshTransport {
    /// The russh session handle (None once closed).
    session: Option<Handle<SshHandler>>,

    /// Shell channel wrapped in the prompt reader.
    reader: PromptReader<ShellChannel>,
}

impl SshTransport {
    /// Connect, authenticate, open a shell and wait for the first prompt.
    ///
    /// Authentication is part of the SSH handshake here, so bad credentials
    /// fail this call with `TransportError::AuthenticationFailed`.
    pub async fn connect(config: &SessionConfig, profile: &VendorProfile) -> Result<Self> {
        debug!("ssh: connecting to {}", config.socket_addr());

        let ssh_config = Arc::new(client::Config {
            inactivity_timeout: Some(config.timeout),
            ..Default::default()
        });

        let host_key_error: Arc<Mutex<Option<TransportError>>> = Arc::new(Mutex::new(None));

        let handler = SshHandler {
            host: config.host.clone(),
            port: config.port,
            host_key_verification: config.host_key_verification.clone(),
            known_hosts_path: config.known_hosts_path.clone(),
            host_key_error: host_key_error.clone(),
        };

        let mut session = tokio::time::timeout(
            config.timeout,
            client::connect(ssh_config, (config.host.as_str(), config.port), handler),
        )
        .await
        .map_err(|_| TransportError::Timeout(config.timeout))?
        .map_err(|e| {
            // Prefer the detailed error recorded by check_server_key over
            // the generic russh::Error::UnknownKey
            match host_key_error.lock().ok().and_then(|mut slot| slot.take()) {
                Some(hk_err) => hk_err,
                None => TransportError::Ssh(e),
            }
        })?;

        let shell = async {
            Self::authenticate(&mut session, config).await?;
            Self::open_shell(&session, config).await
        }
        .await;
        let channel = match shell {
            Ok(channel) => channel,
            Err(e) => {
                Self::disconnect(&session).await;
                return Err(e);
            }
        };

        let mut transport = Self {
            session: Some(session),
            reader: PromptReader::new(ShellChannel { channel }, config.search_depth),
        };

        if let Err(e) = transport
            .read_until(&profile.operational_prompt, config.timeout)
            .await
        {
            transport.close().await;
            return Err(e);
        }

        debug!("ssh: shell ready on {}", config.socket_addr());
        Ok(transport)
    }

    async fn authenticate(session: &mut Handle<SshHandler>, config: &SessionConfig) -> Result<()> {
        let success = session
            .authenticate_password(&config.username, config.password.expose_secret())
            .await
            .map_err(TransportError::Ssh)?
            .success();

        if !success {
            return Err(TransportError::AuthenticationFailed {
                user: config.username.clone(),
            }
            .into());
        }

        Ok(())
    }

    async fn disconnect(session: &Handle<SshHandler>) {
        if let Err(e) = session
            .disconnect(russh::Disconnect::ByApplication, "", "en")
            .await
        {
            warn!("ssh: disconnect failed: {}", e);
        }
    }

    async fn open_shell(session: &Handle<SshHandler>, config: &SessionConfig) -> Result<Channel<Msg>> {
        let channel = session
            .channel_open_session()
            .await
            .map_err(TransportError::Ssh)?;

        channel
            .request_pty(
                true,
                "vt100",
                config.terminal_width,
                config.terminal_height,
                0,
                0,
                &[],
            )
            .await
            .map_err(ChannelError::PtyOpenFailed)?;

        channel
            .request_shell(true)
            .await
            .map_err(ChannelError::ShellRequestFailed)?;

        Ok(channel)
    }
}

impl Transport for SshTransport {
    async fn send_line(&mut self, text: &str) -> Result<()> {
        let mut line = text.trim_end_matches(['\r', '\n']).as_bytes().to_vec();
        line.push(b'\n');

        self.reader
            .source_mut()
            .channel
            .data(&line[..])
            .await
            .map_err(ChannelError::Send)?;
        trace!("ssh: wrote {} bytes", line.len());
        Ok(())
    }

    async fn read_until(&mut self, pattern: &Regex, timeout: Duration) -> Result<ReadResult> {
        if self.session.is_none() {
            return Err(ChannelError::Closed.into());
        }
        self.reader.read_until(pattern, timeout).await
    }

    async fn close(&mut self) {
        let Some(session) = self.session.take() else {
            return;
        };

        if let Err(e) = self.reader.source_mut().channel.close().await {
            debug!("ssh: channel close failed: {}", e);
        }
        Self::disconnect(&session).await;
        debug!("ssh: closed");
    }
}

/// SSH client handler for russh.
struct SshHandler {
    host: String,
    port: u16,
    host_key_verification: HostKeyVerification,
    known_hosts_path: Option<PathBuf>,
    /// Stores a detailed host-key error so connect() can surface it
    /// instead of the generic russh::Error::UnknownKey.
    host_key_error: Arc<Mutex<Option<TransportError>>>,
}

impl SshHandler {
    /// Check the host key against known_hosts.
    ///
    /// Returns `Ok(true)` if matched, `Ok(false)` if host not found,
    /// `Err(TransportError::HostKeyChanged)` if key changed.
    fn check_known_hosts(&self, pubkey: &PublicKey) -> std::result::Result<bool, TransportError> {
        let result = if let Some(ref path) = self.known_hosts_path {
            russh::keys::check_known_hosts_path(&self.host, self.port, pubkey, path)
        } else {
            russh::keys::check_known_hosts(&self.host, self.port, pubkey)
        };

        match result {
            Ok(matched) => Ok(matched),
            Err(russh::keys::Error::KeyChanged { line }) => Err(TransportError::HostKeyChanged {
                host: self.host.clone(),
                port: self.port,
                line,
            }),
            Err(e) => Err(TransportError::KnownHosts(e.to_string())),
        }
    }

    /// Save a new host key to known_hosts.
    fn learn_host_key(&self, pubkey: &PublicKey) -> std::result::Result<(), TransportError> {
        let result = if let Some(ref path) = self.known_hosts_path {
            russh::keys::known_hosts::learn_known_hosts_path(&self.host, self.port, pubkey, path)
        } else {
            russh::keys::known_hosts::learn_known_hosts(&self.host, self.port, pubkey)
        };

        result.map_err(|e| TransportError::KnownHosts(e.to_string()))
    }

    fn reject(&self, error: TransportError) -> bool {
        if let Ok(mut slot) = self.host_key_error.lock() {
            *slot = Some(error);
        }
        false
    }
}

impl client::Handler for SshHandler {
    type Error = russh::Error;

    async fn check_server_key(
        &mut self,
        server_public_key: &PublicKey,
    ) -> std::result::Result<bool, Self::Error> {
        match self.host_key_verification {
            HostKeyVerification::Disabled => Ok(true),

            HostKeyVerification::AcceptNew => match self.check_known_hosts(server_public_key) {
                Ok(true) => Ok(true),
                Ok(false) => {
                    if let Err(e) = self.learn_host_key(server_public_key) {
                        warn!("Failed to save host key: {}", e);
                    }
                    Ok(true)
                }
                Err(e) => Ok(self.reject(e)),
            },

            HostKeyVerification::Strict => match self.check_known_hosts(server_public_key) {
                Ok(true) => Ok(true),
                Ok(false) => Ok(self.reject(TransportError::HostKeyUnknown {
                    host: self.host.clone(),
                    port: self.port,
                })),
                Err(e) => Ok(self.reject(e)),
            },
        }
    }
}
