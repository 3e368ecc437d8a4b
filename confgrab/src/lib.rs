//! # Confgrab
//!
//! Fetch the running configuration of a network device over telnet or SSH
//! and report the outcome in the form monitoring checks expect.
//!
//! The interesting part is the session protocol: log in, escalate
//! privilege, turn paging off, capture the configuration and tear the
//! session down, all by matching prompts in a byte stream that arrives in
//! arbitrary pieces. The sequence is the same for every device family;
//! only the prompts and commands in a [`VendorProfile`] differ.
//!
//! ## Supported devices
//!
//! | OS tag      | Family             |
//! |-------------|--------------------|
//! | `ios`       | Cisco IOS          |
//! | `catos`     | Cisco CatOS        |
//! | `h3c`       | H3C Comware        |
//! | `enterasys` | Enterasys          |
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use confgrab::{NetworkConnector, SessionBuilder, capture_config, report};
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), confgrab::Error> {
//!     let config = SessionBuilder::new("192.168.1.1")
//!         .username("admin")
//!         .password("secret")
//!         .enable_password("enable-secret")
//!         .build()?;
//!
//!     let result = capture_config(&NetworkConnector, &config, "ios").await;
//!     let status = report(&result, Duration::from_secs(60));
//!     println!("{status}");
//!     Ok(())
//! }
//! ```

pub mod archive;
pub mod channel;
pub mod driver;
pub mod error;
pub mod platform;
pub mod report;
pub mod transport;

// Re-export main types for convenience
pub use driver::{
    Capture, CaptureFailure, CaptureResult, FailureKind, SessionBuilder, SessionDriver,
    SessionState, capture_config,
};
pub use error::{Error, Result};
pub use platform::{VendorProfile, VendorRegistry};
pub use report::{Report, Status, report};
pub use transport::{
    Connector, HostKeyVerification, NetworkConnector, SessionConfig, Transport, TransportMode,
};
