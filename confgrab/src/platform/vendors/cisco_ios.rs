//! Cisco IOS profile.
//!
//! # Prompt Examples
//!
//! ```text
//! User Access Verification
//!
//! Username: admin
//! Password:
//! router>                 # user EXEC
//! router#                 # privileged EXEC after `enable`
//! ```

use crate::platform::VendorProfile;

/// Create the Cisco IOS profile.
pub fn profile() -> VendorProfile {
    VendorProfile::new(
        "ios",
        r"(?i)(?:user ?name|login)\s*:",
        r"(?i)password\s*:",
        r"(?m)^[\w.\-@()/:]{1,63}[>#]",
    )
    .unwrap()
    .with_privileged_prompt(r"(?m)^[\w.\-@/:]{1,63}#")
    .unwrap()
    .with_privilege_command("enable")
    .with_pagination_command("terminal length 0")
    .with_config_command("show running-config")
    .with_failure_pattern("% Invalid input")
    .with_failure_pattern("% Incomplete command")
    .with_failure_pattern("% Ambiguous command")
    .with_failure_pattern("% Unknown command")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_prompts() {
        let profile = profile();
        assert!(profile.login_prompt.is_match(b"User Access Verification\r\n\r\nUsername: "));
        assert!(profile.login_prompt.is_match(b"login:"));
        assert!(profile.password_prompt.is_match(b"admin\r\nPassword: "));
        assert!(!profile.password_prompt.is_match(b"Password: secret\r\n"));
    }

    #[test]
    fn test_operational_prompt() {
        let profile = profile();
        assert!(profile.operational_prompt.is_match(b"\r\nrouter>"));
        assert!(profile.operational_prompt.is_match(b"\r\nrouter# "));
        assert!(profile.operational_prompt.is_match(b"\r\ncore-sw01.lab#"));

        // Banner and configuration lines are not prompts
        assert!(!profile.operational_prompt.is_match(b"\r\nbanner motd #"));
        assert!(!profile.operational_prompt.is_match(b"\r\n no shutdown\r\n"));
    }

    #[test]
    fn test_privileged_prompt() {
        let profile = profile();
        let privileged = profile.privileged_prompt.as_ref().unwrap();
        assert!(privileged.is_match(b"\r\nrouter#"));
        assert!(!privileged.is_match(b"\r\nrouter>"));
        assert!(!privileged.is_match(b"\r\nrouter(config)#"));
    }
}
