//! H3C Comware profile.
//!
//! Comware keeps the same `<sysname>` prompt after `super`, so there is no
//! privileged prompt to verify against.
//!
//! # Prompt Examples
//!
//! ```text
//! <H3C>                   # user view
//! [H3C]                   # system view (not used)
//! ```

use crate::platform::VendorProfile;

/// Create the H3C Comware profile.
pub fn profile() -> VendorProfile {
    VendorProfile::new(
        "h3c",
        r"(?i)username\s*:",
        r"(?i)password\s*:",
        r"(?m)^<[\w.\-@/: ]{1,63}>",
    )
    .unwrap()
    .with_privilege_command("super")
    .with_pagination_command("screen-length disable")
    .with_config_command("display current-configuration")
    .with_failure_pattern("% Unrecognized command")
    .with_failure_pattern("% Incomplete command")
    .with_failure_pattern("% Wrong parameter")
    .with_failure_pattern("% Too many parameters")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operational_prompt() {
        let profile = profile();
        assert!(profile.operational_prompt.is_match(b"\r\n<H3C>"));
        assert!(profile.operational_prompt.is_match(b"\r\n<core-sw01>"));
        assert!(!profile.operational_prompt.is_match(b"\r\n[H3C]"));
        assert!(!profile.operational_prompt.is_match(b"\r\n sysname H3C\r\n"));
    }

    #[test]
    fn test_no_privileged_prompt() {
        assert!(profile().privileged_prompt.is_none());
    }
}
