//! Cisco CatOS profile.
//!
//! # Prompt Examples
//!
//! ```text
//! Console>                # normal mode
//! Console> (enable)       # after `enable`
//! ```

use crate::platform::VendorProfile;

/// Create the Cisco CatOS profile.
pub fn profile() -> VendorProfile {
    VendorProfile::new(
        "catos",
        r"(?i)(?:user ?name|login)\s*:",
        r"(?i)password\s*:",
        r"(?m)^[\w.\-@()/:]{1,63}> ?(?:\(enable\))?",
    )
    .unwrap()
    .with_privileged_prompt(r"(?m)^[\w.\-@()/:]{1,63}> ?\(enable\)")
    .unwrap()
    .with_privilege_command("enable")
    .with_pagination_command("set length 0")
    .with_config_command("show config")
    .with_failure_pattern("Unknown command")
    .with_failure_pattern("Incomplete command")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operational_prompt() {
        let profile = profile();
        assert!(profile.operational_prompt.is_match(b"\r\nConsole> "));
        assert!(profile.operational_prompt.is_match(b"\r\nConsole> (enable) "));
        assert!(!profile.operational_prompt.is_match(b"\r\nset vlan 10 2/1-48\r\n"));
    }

    #[test]
    fn test_privileged_prompt() {
        let profile = profile();
        let privileged = profile.privileged_prompt.as_ref().unwrap();
        assert!(privileged.is_match(b"\r\nConsole> (enable) "));
        assert!(!privileged.is_match(b"\r\nConsole> "));
    }
}
