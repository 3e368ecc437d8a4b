//! Vendor profile: the tokens that differ between device families.

use regex::bytes::Regex;

use crate::channel::compile_prompt_pattern;
use crate::error::PlatformError;

/// Protocol parameters for one device family.
///
/// The session driver never branches on the vendor; everything that varies
/// between families lives here. Prompt patterns are anchored to the end of
/// the received output (see [`compile_prompt_pattern`]).
#[derive(Debug, Clone)]
pub struct VendorProfile {
    /// OS tag this profile is registered under (e.g. "ios", "h3c").
    pub name: String,

    /// Prompt asking for the username during telnet login.
    pub login_prompt: Regex,

    /// Prompt asking for the password during telnet login.
    pub password_prompt: Regex,

    /// Prompt shown when the device is ready for the next command.
    pub operational_prompt: Regex,

    /// Prompt expected after a successful privilege escalation.
    ///
    /// Only consulted when verified escalation is enabled. `None` for
    /// families whose prompt does not change when privileged.
    pub privileged_prompt: Option<Regex>,

    /// Command that starts privilege escalation (e.g. "enable", "super").
    pub privilege_command: String,

    /// Command that prints the configuration.
    pub config_command: String,

    /// Command that disables paged output.
    pub pagination_command: String,

    /// Device error strings that mark a command as rejected.
    pub failed_when_contains: Vec<String>,
}

impl VendorProfile {
    /// Create a profile from its three prompt patterns.
    ///
    /// Commands start empty and must be filled in with the `with_*` methods;
    /// [`validate`](Self::validate) rejects a profile left incomplete.
    pub fn new(
        name: impl Into<String>,
        login_prompt: &str,
        password_prompt: &str,
        operational_prompt: &str,
    ) -> Result<Self, regex::Error> {
        Ok(Self {
            name: name.into(),
            login_prompt: compile_prompt_pattern(login_prompt)?,
            password_prompt: compile_prompt_pattern(password_prompt)?,
            operational_prompt: compile_prompt_pattern(operational_prompt)?,
            privileged_prompt: None,
            privilege_command: String::new(),
            config_command: String::new(),
            pagination_command: String::new(),
            failed_when_contains: vec![],
        })
    }

    /// Set the privilege escalation command.
    pub fn with_privilege_command(mut self, command: impl Into<String>) -> Self {
        self.privilege_command = command.into();
        self
    }

    /// Set the configuration display command.
    pub fn with_config_command(mut self, command: impl Into<String>) -> Self {
        self.config_command = command.into();
        self
    }

    /// Set the pagination disable command.
    pub fn with_pagination_command(mut self, command: impl Into<String>) -> Self {
        self.pagination_command = command.into();
        self
    }

    /// Set the prompt that proves escalation succeeded.
    pub fn with_privileged_prompt(mut self, pattern: &str) -> Result<Self, regex::Error> {
        self.privileged_prompt = Some(compile_prompt_pattern(pattern)?);
        Ok(self)
    }

    /// Add a failure pattern.
    pub fn with_failure_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.failed_when_contains.push(pattern.into());
        self
    }

    /// Check that every field the driver relies on is present.
    pub fn validate(&self) -> Result<(), PlatformError> {
        let missing = [
            ("name", self.name.is_empty()),
            ("login_prompt", self.login_prompt.as_str().is_empty()),
            ("password_prompt", self.password_prompt.as_str().is_empty()),
            ("operational_prompt", self.operational_prompt.as_str().is_empty()),
            ("privilege_command", self.privilege_command.is_empty()),
            ("config_command", self.config_command.is_empty()),
            ("pagination_command", self.pagination_command.is_empty()),
        ]
        .into_iter()
        .find(|(_, empty)| *empty);

        match missing {
            Some((field, _)) => Err(PlatformError::InvalidDefinition {
                message: format!("profile '{}' has an empty {}", self.name, field),
            }),
            None => Ok(()),
        }
    }

    /// Return the first failure pattern contained in `output`.
    pub fn detect_failure(&self, output: &[u8]) -> Option<&str> {
        let text = String::from_utf8_lossy(output);
        self.failed_when_contains
            .iter()
            .find(|pattern| text.contains(pattern.as_str()))
            .map(String::as_str)
    }
}
