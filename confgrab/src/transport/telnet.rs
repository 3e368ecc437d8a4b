//! Telnet transport over any async byte stream.

use std::time::Duration;

use log::{debug, trace, warn};
use regex::bytes::Regex;
use secrecy::ExposeSecret;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::net::TcpStream;

use super::Transport;
use super::config::SessionConfig;
use super::negotiation::{Negotiator, escape_iac};
use crate::channel::{ChunkSource, PromptReader, ReadResult};
use crate::error::{ChannelError, Result, TransportError};
use crate::platform::VendorProfile;

const READ_CHUNK: usize = 4096;

/// Raw stream plus the telnet decoder that sits on it.
struct TelnetStream<S> {
    stream: S,
    negotiator: Negotiator,
}

impl<S> ChunkSource for TelnetStream<S>
where
    S: AsyncRead + AsyncWrite + Unpin + Send,
{
    async fn read_chunk(&mut self) -> Result<Vec<u8>> {
        let mut buf = [0u8; READ_CHUNK];
        let n = self
            .stream
            .read(&mut buf)
            .await
            .map_err(ChannelError::Read)?;
        if n == 0 {
            return Err(ChannelError::Closed.into());
        }

        let decoded = self.negotiator.decode(&buf[..n]);
        if !decoded.replies.is_empty() {
            self.stream
                .write_all(&decoded.replies)
                .await
                .map_err(ChannelError::Write)?;
            self.stream.flush().await.map_err(ChannelError::Write)?;
        }

        Ok(decoded.data)
    }
}

/// Telnet session to a device.
///
/// Generic over the byte stream so the login exchange can be driven by a
/// scripted stream in tests; production code uses `TcpStream`.
pub struct TelnetTransport<S = TcpStream> {
    reader: PromptReader<TelnetStream<S>>,
    closed: bool,
}

impl TelnetTransport<TcpStream> {
    /// Open the TCP connection and log in.
    ///
    /// Login waits for the profile's login prompt, sends the username, waits
    /// for the password prompt, sends the password, then waits for the first
    /// operational prompt. A rejected login therefore shows up as a read
    /// timeout, not as a connection error.
    pub async fn connect(config: &SessionConfig, profile: &VendorProfile) -> Result<Self> {
        debug!("telnet: connecting to {}", config.socket_addr());

        let stream = tokio::time::timeout(
            config.timeout,
            TcpStream::connect((config.host.as_str(), config.port)),
        )
        .await
        .map_err(|_| TransportError::Timeout(config.timeout))?
        .map_err(|source| TransportError::ConnectionFailed {
            host: config.host.clone(),
            port: config.port,
            source,
        })?;

        let mut transport = Self::new(stream, config.search_depth);
        if let Err(e) = transport.login(config, profile).await {
            transport.close().await;
            return Err(e);
        }
        Ok(transport)
    }
}

impl<S> TelnetTransport<S>
where
    S: AsyncRead + AsyncWrite + Unpin + Send,
{
    /// Wrap an already connected stream.
    pub fn new(stream: S, search_depth: usize) -> Self {
        let source = TelnetStream {
            stream,
            negotiator: Negotiator::new(),
        };
        Self {
            reader: PromptReader::new(source, search_depth),
            closed: false,
        }
    }

    /// Run the username/password exchange.
    pub async fn login(&mut self, config: &SessionConfig, profile: &VendorProfile) -> Result<()> {
        let timeout = config.timeout;

        self.read_until(&profile.login_prompt, timeout).await?;
        self.send_line(&config.username).await?;

        self.read_until(&profile.password_prompt, timeout).await?;
        self.send_line(config.password.expose_secret()).await?;

        self.read_until(&profile.operational_prompt, timeout).await?;
        debug!("telnet: logged in as '{}'", config.username);
        Ok(())
    }

    async fn write_line(&mut self, text: &str) -> Result<()> {
        let mut line = escape_iac(text.trim_end_matches(['\r', '\n']).as_bytes());
        line.extend_from_slice(b"\r\n");

        let stream = &mut self.reader.source_mut().stream;
        stream.write_all(&line).await.map_err(ChannelError::Write)?;
        stream.flush().await.map_err(ChannelError::Write)?;
        trace!("telnet: wrote {} bytes", line.len());
        Ok(())
    }
}

impl<S> Transport for TelnetTransport<S>
where
    S: AsyncRead + AsyncWrite + Unpin + Send,
{
    async fn send_line(&mut self, text: &str) -> Result<()> {
        self.write_line(text).await
    }

    async fn read_until(&mut self, pattern: &Regex, timeout: Duration) -> Result<ReadResult> {
        if self.closed {
            return Err(ChannelError::Closed.into());
        }
        self.reader.read_until(pattern, timeout).await
    }

    async fn close(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;

        if let Err(e) = self.reader.source_mut().stream.shutdown().await {
            warn!("telnet: shutdown failed: {}", e);
        }
        debug!("telnet: closed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::normalize_newlines;
    use crate::driver::SessionBuilder;
    use crate::error::Error;
    use crate::platform::lookup;
    use crate::transport::negotiation::{DO, IAC, OPT_ECHO, WILL, WONT};

    fn config() -> SessionConfig {
        SessionBuilder::new("10.0.0.1")
            .username("admin")
            .password("s3cret")
            .enable_password("en4ble")
            .timeout(Duration::from_secs(5))
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn test_login_exchange() {
        let stream = tokio_test::io::Builder::new()
            .read(&[IAC, DO, 24, IAC, WILL, OPT_ECHO])
            .write(&[IAC, WONT, 24, IAC, DO, OPT_ECHO])
            .read(b"\r\nUser Access Verification\r\n\r\nUsername: ")
            .write(b"admin\r\n")
            .read(b"Password: ")
            .write(b"s3cret\r\n")
            .read(b"\r\nrouter>")
            .build();

        let profile = lookup("ios").unwrap();
        let mut transport = TelnetTransport::new(stream, 1000);
        transport.login(&config(), &profile).await.unwrap();
    }

    #[tokio::test]
    async fn test_command_round_trip() {
        let stream = tokio_test::io::Builder::new()
            .write(b"show running-config\r\n")
            .read(b"show running-config\r\nhostname r1\r\n")
            .read(b"end\r\n\r\nr1#")
            .build();

        let profile = lookup("ios").unwrap();
        let mut transport = TelnetTransport::new(stream, 1000);
        transport.send_line("show running-config").await.unwrap();
        let result = transport
            .read_until(&profile.operational_prompt, Duration::from_secs(5))
            .await
            .unwrap();

        assert_eq!(result.matched_str(), "r1#");
        assert_eq!(
            normalize_newlines(&result.data),
            b"show running-config\nhostname r1\nend\n\n".to_vec()
        );
    }

    #[tokio::test]
    async fn test_bare_return_is_one_empty_line() {
        let stream = tokio_test::io::Builder::new()
            .write(b"\r\n")
            .write(b"en4ble\r\n")
            .build();

        let mut transport = TelnetTransport::new(stream, 1000);
        transport.send_line("\n").await.unwrap();
        transport.send_line("en4ble").await.unwrap();
    }

    #[tokio::test]
    async fn test_peer_close_is_read_error() {
        let stream = tokio_test::io::Builder::new()
            .read(b"Username: ")
            .build();

        let profile = lookup("h3c").unwrap();
        let mut transport = TelnetTransport::new(stream, 1000);
        transport
            .read_until(&profile.login_prompt, Duration::from_secs(5))
            .await
            .unwrap();

        let err = transport
            .read_until(&profile.password_prompt, Duration::from_secs(5))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Channel(ChannelError::Closed)));
    }

    #[tokio::test]
    async fn test_close_is_idempotent() {
        let stream = tokio_test::io::Builder::new().build();
        let mut transport = TelnetTransport::new(stream, 1000);

        transport.close().await;
        transport.close().await;

        let profile = lookup("ios").unwrap();
        let err = transport
            .read_until(&profile.operational_prompt, Duration::from_secs(1))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Channel(ChannelError::Closed)));
    }
}
