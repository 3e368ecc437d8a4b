//! Scripted transport for driving the session protocol without a device.

use std::collections::VecDeque;
use std::io;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use regex::bytes::Regex;

use crate::channel::{PatternBuffer, ReadResult};
use crate::error::{ChannelError, Result, TransportError};
use crate::platform::VendorProfile;
use crate::transport::{Connector, SessionConfig, Transport};

/// What the scripted device does on the next `read_until`.
#[derive(Debug, Clone)]
pub(crate) enum Step {
    /// Output delivered in one or more reads.
    Output(Vec<Vec<u8>>),
    /// Nothing arrives before the deadline.
    Timeout,
    /// The connection drops.
    ReadError,
}

impl Step {
    pub(crate) fn output(text: &str) -> Self {
        Step::Output(vec![text.as_bytes().to_vec()])
    }

    pub(crate) fn chunks(chunks: &[&str]) -> Self {
        Step::Output(chunks.iter().map(|c| c.as_bytes().to_vec()).collect())
    }

    /// Output that is not necessarily UTF-8, one read per chunk.
    pub(crate) fn raw(chunks: &[&[u8]]) -> Self {
        Step::Output(chunks.iter().map(|c| c.to_vec()).collect())
    }
}

#[derive(Debug, Clone, Copy)]
enum ConnectBehavior {
    Succeed,
    Refuse,
    LoginTimeout,
}

#[derive(Debug, Default)]
struct Counters {
    connects: AtomicUsize,
    closes: AtomicUsize,
    sent: Mutex<Vec<String>>,
}

/// Hands out one [`ScriptedTransport`] per connect.
pub(crate) struct ScriptedConnector {
    steps: Vec<Step>,
    behavior: ConnectBehavior,
    fail_send_at: Option<usize>,
    counters: Arc<Counters>,
}

impl ScriptedConnector {
    pub(crate) fn new(steps: Vec<Step>) -> Self {
        Self {
            steps,
            behavior: ConnectBehavior::Succeed,
            fail_send_at: None,
            counters: Arc::default(),
        }
    }

    /// A connector whose host refuses the connection.
    pub(crate) fn refusing() -> Self {
        Self {
            behavior: ConnectBehavior::Refuse,
            ..Self::new(vec![])
        }
    }

    /// A connector whose login exchange never sees the operational prompt.
    pub(crate) fn login_timeout() -> Self {
        Self {
            behavior: ConnectBehavior::LoginTimeout,
            ..Self::new(vec![])
        }
    }

    /// Make the `index`th line sent (counting from zero) fail.
    pub(crate) fn fail_send_at(mut self, index: usize) -> Self {
        self.fail_send_at = Some(index);
        self
    }

    pub(crate) fn connects(&self) -> usize {
        self.counters.connects.load(Ordering::SeqCst)
    }

    pub(crate) fn closes(&self) -> usize {
        self.counters.closes.load(Ordering::SeqCst)
    }

    pub(crate) fn sent(&self) -> Vec<String> {
        self.counters.sent.lock().unwrap().clone()
    }
}

impl Connector for ScriptedConnector {
    type Transport = ScriptedTransport;

    async fn connect(
        &self,
        config: &SessionConfig,
        profile: &VendorProfile,
    ) -> Result<ScriptedTransport> {
        self.counters.connects.fetch_add(1, Ordering::SeqCst);

        let mut transport = ScriptedTransport {
            steps: self.steps.clone().into(),
            buffer: PatternBuffer::new(config.search_depth),
            sends: 0,
            fail_send_at: self.fail_send_at,
            closed: false,
            counters: self.counters.clone(),
        };

        match self.behavior {
            ConnectBehavior::Succeed => Ok(transport),
            ConnectBehavior::Refuse => Err(TransportError::ConnectionFailed {
                host: config.host.clone(),
                port: config.port,
                source: io::Error::from(io::ErrorKind::ConnectionRefused),
            }
            .into()),
            ConnectBehavior::LoginTimeout => {
                transport.steps = VecDeque::from([Step::output("Username: ")]);
                let result = async {
                    transport.read_until(&profile.login_prompt, config.timeout).await?;
                    transport.read_until(&profile.operational_prompt, config.timeout).await
                }
                .await;
                transport.close().await;
                result.map(|_| transport)
            }
        }
    }
}

/// Replays a script of device output.
///
/// Each `read_until` consumes steps until its pattern matches; running out
/// of script counts as a timeout.
pub(crate) struct ScriptedTransport {
    steps: VecDeque<Step>,
    buffer: PatternBuffer,
    sends: usize,
    fail_send_at: Option<usize>,
    closed: bool,
    counters: Arc<Counters>,
}

impl Transport for ScriptedTransport {
    async fn send_line(&mut self, text: &str) -> Result<()> {
        let index = self.sends;
        self.sends += 1;
        if self.fail_send_at == Some(index) {
            return Err(ChannelError::Write(io::Error::from(io::ErrorKind::BrokenPipe)).into());
        }
        // Lines are recorded as they would go on the wire, without a terminator.
        let line = text.trim_end_matches(['\r', '\n']);
        self.counters.sent.lock().unwrap().push(line.to_string());
        Ok(())
    }

    async fn read_until(&mut self, pattern: &Regex, timeout: Duration) -> Result<ReadResult> {
        if self.closed {
            return Err(ChannelError::Closed.into());
        }

        loop {
            if let Some((data, matched)) = self.buffer.take_through(pattern) {
                return Ok(ReadResult { data, matched });
            }

            match self.steps.pop_front() {
                Some(Step::Output(mut chunks)) => {
                    if chunks.is_empty() {
                        continue;
                    }
                    let chunk = chunks.remove(0);
                    self.buffer.extend(&chunk);
                    if !chunks.is_empty() {
                        self.steps.push_front(Step::Output(chunks));
                    }
                }
                Some(Step::ReadError) => return Err(ChannelError::Closed.into()),
                Some(Step::Timeout) | None => {
                    return Err(ChannelError::PatternTimeout(timeout).into());
                }
            }
        }
    }

    async fn close(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        self.counters.closes.fetch_add(1, Ordering::SeqCst);
    }
}
