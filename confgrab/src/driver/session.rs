//! Session protocol driver.

use std::time::Instant;

use log::{debug, info, warn};
use secrecy::ExposeSecret;

use super::capture::{Capture, CaptureFailure, CaptureResult};
use super::state::SessionState;
use crate::channel::{normalize_newlines, strip_echo};
use crate::error::{ChannelError, DriverError, Result};
use crate::platform::VendorProfile;
use crate::transport::{Connector, SessionConfig, Transport};

/// Line sent to end the CLI session after a successful capture.
const QUIT_COMMAND: &str = "quit";

/// Drives one device through login, escalation, capture and teardown.
///
/// The sequence is the same for every device family; only the tokens in
/// the [`VendorProfile`] differ. A driver runs once: each call to
/// [`run`](Self::run) opens its own session and always leaves the driver in
/// [`SessionState::Closed`].
///
/// # Example
///
/// ```rust,no_run
/// use confgrab::driver::{SessionBuilder, SessionDriver};
/// use confgrab::platform::lookup;
/// use confgrab::transport::NetworkConnector;
///
/// # async fn example() -> Result<(), confgrab::Error> {
/// let config = SessionBuilder::new("192.168.1.1")
///     .username("admin")
///     .password("secret")
///     .enable_password("enable-secret")
///     .build()?;
/// let profile = lookup("ios")?;
///
/// let mut driver = SessionDriver::new(&config, &profile);
/// match driver.run(&NetworkConnector).await {
///     Ok(capture) => println!("{} bytes", capture.len()),
///     Err(failure) => eprintln!("{failure}"),
/// }
/// # Ok(())
/// # }
/// ```
pub struct SessionDriver<'a> {
    config: &'a SessionConfig,
    profile: &'a VendorProfile,
    state: SessionState,
}

impl<'a> SessionDriver<'a> {
    pub fn new(config: &'a SessionConfig, profile: &'a VendorProfile) -> Self {
        Self {
            config,
            profile,
            state: SessionState::Disconnected,
        }
    }

    /// Current state of the protocol sequence.
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Run the whole sequence against a session opened by `connector`.
    ///
    /// Every opened session is closed exactly once, whichever step fails.
    /// The quit line is only sent when the capture succeeded; on failure
    /// the session is torn down directly.
    pub async fn run<C: Connector>(&mut self, connector: &C) -> CaptureResult {
        let start = Instant::now();
        let config = self.config;

        self.transition(SessionState::Authenticating);
        let mut transport = match connector.connect(config, self.profile).await {
            Ok(transport) => transport,
            Err(e) => {
                warn!("{}: connect failed: {}", config.host, e);
                self.transition(SessionState::Closed);
                return Err(CaptureFailure::from(e));
            }
        };

        let outcome = self.exchange(&mut transport).await;

        self.transition(SessionState::Disconnecting);
        match &outcome {
            Ok(_) => {
                if let Err(e) = transport.send_line(QUIT_COMMAND).await {
                    warn!("{}: failed to send quit: {}", config.host, e);
                }
            }
            Err(e) => warn!("{}: {} failed: {}", config.host, self.profile.name, e),
        }
        transport.close().await;
        self.transition(SessionState::Closed);

        info!(
            "{}: finished in {:.2}s ({})",
            config.host,
            start.elapsed().as_secs_f64(),
            if outcome.is_ok() { "ok" } else { "failed" }
        );

        outcome.map_err(CaptureFailure::from)
    }

    /// Escalate, disable paging and capture the configuration.
    async fn exchange<T: Transport>(&mut self, transport: &mut T) -> Result<Capture> {
        let profile = self.profile;

        self.transition(SessionState::Privileged);
        self.acquire_privilege(transport).await?;

        self.transition(SessionState::PaginationSuppressed);
        self.send_command(transport, &profile.pagination_command)
            .await?;

        self.transition(SessionState::Capturing);
        let command = &profile.config_command;
        let output = self.capture(transport, command).await?;

        if let Some(failure) = profile.detect_failure(&output) {
            return Err(DriverError::CommandFailed {
                command: command.clone(),
                message: failure.to_string(),
            }
            .into());
        }

        if output.iter().all(u8::is_ascii_whitespace) {
            return Err(DriverError::EmptyCapture {
                command: command.clone(),
            }
            .into());
        }

        debug!("{}: captured {} bytes", self.config.host, output.len());
        Ok(Capture::new(output))
    }

    /// Send the escalation command and the enable password.
    ///
    /// The device is not required to prompt for the password in between.
    /// Only with `verify_privilege` set is the resulting prompt checked.
    async fn acquire_privilege<T: Transport>(&self, transport: &mut T) -> Result<()> {
        let config = self.config;
        let profile = self.profile;

        debug!("{}: sending '{}'", config.host, profile.privilege_command);
        transport.send_line(&profile.privilege_command).await?;

        debug!("{}: sending <hidden>", config.host);
        transport
            .send_line(config.enable_password.expose_secret())
            .await?;

        let result = transport
            .read_until(&profile.operational_prompt, config.timeout)
            .await?;

        if config.verify_privilege {
            if let Some(privileged) = &profile.privileged_prompt {
                if !privileged.is_match(&result.matched) {
                    return Err(DriverError::PrivilegeAcquisitionFailed {
                        prompt: result.matched_str().trim().to_string(),
                    }
                    .into());
                }
            }
        }

        Ok(())
    }

    /// Send a command and wait for the prompt after it.
    async fn send_command<T: Transport>(&self, transport: &mut T, command: &str) -> Result<()> {
        debug!("{}: sending '{}'", self.config.host, command);
        transport.send_line(command).await?;

        transport
            .read_until(&self.profile.operational_prompt, self.config.timeout)
            .await?;
        Ok(())
    }

    /// Send `command` and return its output with echo and CR removed.
    ///
    /// A device that never asked for the enable password answers it with an
    /// error and one more prompt, which can still be queued when `command`
    /// goes out. Output up to each prompt is skipped until it starts with
    /// the echo of `command`; the echo must arrive within one timeout.
    async fn capture<T: Transport>(&self, transport: &mut T, command: &str) -> Result<Vec<u8>> {
        let config = self.config;
        debug!("{}: sending '{}'", config.host, command);
        transport.send_line(command).await?;

        tokio::time::timeout(config.timeout, self.read_echoed(transport, command))
            .await
            .map_err(|_| ChannelError::PatternTimeout(config.timeout))?
    }

    async fn read_echoed<T: Transport>(&self, transport: &mut T, command: &str) -> Result<Vec<u8>> {
        loop {
            let result = transport
                .read_until(&self.profile.operational_prompt, self.config.timeout)
                .await?;
            match strip_echo(&result.data, command) {
                Some(output) => return Ok(normalize_newlines(output)),
                None => debug!(
                    "{}: skipping {} bytes ahead of '{}'",
                    self.config.host,
                    result.data.len(),
                    command
                ),
            }
        }
    }

    fn transition(&mut self, next: SessionState) {
        debug!("{}: {} -> {}", self.config.host, self.state, next);
        self.state = next;
    }
}
