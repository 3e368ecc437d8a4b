//! Session protocol driver.
//!
//! The driver sequences one device session: connect (which logs in),
//! escalate privilege, disable paging, capture the configuration, quit and
//! close. The sequence is vendor-agnostic; everything that varies between
//! device families comes from a [`VendorProfile`](crate::platform::VendorProfile).

mod builder;
mod capture;
mod session;
mod state;

#[cfg(test)]
pub(crate) mod testing;

pub use builder::SessionBuilder;
pub use capture::{Capture, CaptureFailure, CaptureResult, FailureKind};
pub use session::SessionDriver;
pub use state::SessionState;

use log::info;

use crate::platform;
use crate::transport::{Connector, SessionConfig};

/// Capture the configuration of one device.
///
/// The OS tag is resolved before anything touches the network, so an
/// unknown tag fails without a connection attempt.
pub async fn capture_config<C: Connector>(
    connector: &C,
    config: &SessionConfig,
    os_tag: &str,
) -> CaptureResult {
    let profile = platform::lookup(os_tag)?;

    info!(
        "{}: capturing {} configuration over {}",
        config.host, profile.name, config.mode
    );

    SessionDriver::new(config, &profile).run(connector).await
}
