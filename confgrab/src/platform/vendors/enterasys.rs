//! Enterasys (Extreme EOS) profile.
//!
//! These switches log straight into the privilege level of the account,
//! so escalation is a bare return.
//!
//! # Prompt Examples
//!
//! ```text
//! Username:admin
//! Password:
//! C2(su)->
//! Matrix(rw)->
//! ```

use crate::platform::VendorProfile;

/// Create the Enterasys profile.
pub fn profile() -> VendorProfile {
    VendorProfile::new(
        "enterasys",
        r"(?i)username\s*:",
        r"(?i)password\s*:",
        r"(?m)^[\w.\-@/:()]{1,63}->",
    )
    .unwrap()
    .with_privilege_command("\n")
    .with_pagination_command("set length 0")
    .with_config_command("show config")
    .with_failure_pattern("Invalid input detected")
}
