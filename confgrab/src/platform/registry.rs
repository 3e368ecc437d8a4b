//! Registry mapping OS tags to vendor profiles.

use indexmap::IndexMap;

use super::profile::VendorProfile;
use super::vendors;
use crate::error::{PlatformError, Result};

/// Registry for vendor profiles, keyed by OS tag.
///
/// Adding a device family is one `register` call; the session driver is
/// never touched.
#[derive(Debug, Clone, Default)]
pub struct VendorRegistry {
    profiles: IndexMap<String, VendorProfile>,
}

impl VendorRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self {
            profiles: IndexMap::new(),
        }
    }

    /// Create a registry holding the built-in device families.
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        for profile in [
            vendors::cisco_ios::profile(),
            vendors::cisco_catos::profile(),
            vendors::h3c_comware::profile(),
            vendors::enterasys::profile(),
        ] {
            registry.profiles.insert(profile.name.clone(), profile);
        }
        registry
    }

    /// Register a vendor profile.
    pub fn register(&mut self, profile: VendorProfile) -> Result<()> {
        profile.validate()?;
        if self.profiles.contains_key(&profile.name) {
            return Err(PlatformError::AlreadyRegistered {
                name: profile.name.clone(),
            }
            .into());
        }
        self.profiles.insert(profile.name.clone(), profile);
        Ok(())
    }

    /// Look up the profile for an OS tag.
    pub fn lookup(&self, os_tag: &str) -> Result<&VendorProfile> {
        self.profiles.get(os_tag).ok_or_else(|| {
            PlatformError::UnknownPlatform {
                name: os_tag.to_string(),
                known: self.names().cloned().collect::<Vec<_>>().join(", "),
            }
            .into()
        })
    }

    /// Check if a profile is registered.
    pub fn contains(&self, os_tag: &str) -> bool {
        self.profiles.contains_key(os_tag)
    }

    /// List registered OS tags in registration order.
    pub fn names(&self) -> impl Iterator<Item = &String> {
        self.profiles.keys()
    }
}

/// Look up a built-in profile by OS tag.
pub fn lookup(os_tag: &str) -> Result<VendorProfile> {
    VendorRegistry::builtin().lookup(os_tag).cloned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn test_builtin_tags() {
        let registry = VendorRegistry::builtin();
        let names: Vec<_> = registry.names().map(String::as_str).collect();
        assert_eq!(names, ["ios", "catos", "h3c", "enterasys"]);
    }

    #[test]
    fn test_every_builtin_profile_is_complete() {
        let registry = VendorRegistry::builtin();
        for name in ["ios", "catos", "h3c", "enterasys"] {
            let profile = registry.lookup(name).unwrap();
            assert_eq!(profile.name, name);
            profile.validate().unwrap();
        }
    }

    #[test]
    fn test_unknown_tag() {
        let err = lookup("junos").unwrap_err();
        match err {
            Error::Platform(PlatformError::UnknownPlatform { name, known }) => {
                assert_eq!(name, "junos");
                assert_eq!(known, "ios, catos, h3c, enterasys");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_register_new_family() {
        let mut registry = VendorRegistry::builtin();
        let profile = VendorProfile::new("eos", r"login:", r"[Pp]assword:", r"(?m)^\S+[>#]")
            .unwrap()
            .with_privilege_command("enable")
            .with_config_command("show running-config")
            .with_pagination_command("terminal length 0");

        registry.register(profile.clone()).unwrap();
        assert!(registry.contains("eos"));

        let err = registry.register(profile).unwrap_err();
        assert!(matches!(
            err,
            Error::Platform(PlatformError::AlreadyRegistered { .. })
        ));
    }

    #[test]
    fn test_register_rejects_incomplete_profile() {
        let mut registry = VendorRegistry::new();
        let profile = VendorProfile::new("bare", r"login:", r"password:", r"#").unwrap();
        assert!(registry.register(profile).is_err());
        assert!(!registry.contains("bare"));
    }
}
