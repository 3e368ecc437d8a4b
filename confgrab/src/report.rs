//! Monitoring status line for a capture run.
//!
//! Two outcomes only: `OK|size=<N>B` with exit code 0, or `Critical` with
//! exit code 2 and the failure detail appended.

use std::fmt;
use std::time::Duration;

use log::debug;

use crate::driver::CaptureResult;

/// Outcome reported to the monitoring caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Ok,
    Critical,
}

impl Status {
    /// Process exit code for this status.
    pub fn exit_code(self) -> i32 {
        match self {
            Status::Ok => 0,
            Status::Critical => 2,
        }
    }

    /// Label printed at the start of the status line.
    pub fn label(self) -> &'static str {
        match self {
            Status::Ok => "OK",
            Status::Critical => "Critical",
        }
    }
}

/// Status plus the summary printed after the label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub status: Status,
    pub summary: String,
}

impl Report {
    pub fn exit_code(&self) -> i32 {
        self.status.exit_code()
    }

    pub fn label(&self) -> &'static str {
        self.status.label()
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status {
            Status::Ok => write!(f, "{}|{}", self.label(), self.summary),
            Status::Critical if self.summary.is_empty() => f.write_str(self.label()),
            Status::Critical => write!(f, "{} - {}", self.label(), self.summary),
        }
    }
}

/// Map a capture result to the monitoring status.
///
/// `critical_time` is accepted for parity with other checks but does not
/// influence the status: only success or failure of the capture does.
pub fn report(result: &CaptureResult, critical_time: Duration) -> Report {
    debug!("critical time {:?} (informational)", critical_time);

    match result {
        Ok(capture) => Report {
            status: Status::Ok,
            summary: format!("size={}B", capture.len()),
        },
        Err(failure) => Report {
            status: Status::Critical,
            summary: failure.to_string().replace(['\r', '\n'], " "),
        },
    }
}
