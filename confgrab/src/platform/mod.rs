//! Vendor profiles for multi-vendor support.
//!
//! Protocol sequencing is the same for every device family; only the
//! prompt patterns and command tokens differ. Those tokens live in a
//! [`VendorProfile`], looked up by OS tag in a [`VendorRegistry`].

mod profile;
mod registry;
pub mod vendors;

pub use profile::VendorProfile;
pub use registry::{VendorRegistry, lookup};
