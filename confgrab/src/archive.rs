//! Writes captured configurations to disk.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{Datelike, NaiveDate};
use log::debug;

use crate::driver::Capture;
use crate::error::{Error, Result};

/// Path of the archive file for `host` on `date`.
///
/// The name is `<host>_<day>-<month>-<year>.confg` with day and month not
/// zero-padded, so a second run on the same day targets the same file.
pub fn archive_path(directory: &Path, host: &str, date: NaiveDate) -> PathBuf {
    directory.join(format!(
        "{}_{}-{}-{}.confg",
        host,
        date.day(),
        date.month(),
        date.year()
    ))
}

/// Write the capture, replacing any earlier file for the same host and day.
pub fn write_capture(
    directory: &Path,
    host: &str,
    date: NaiveDate,
    capture: &Capture,
) -> Result<PathBuf> {
    let path = archive_path(directory, host, date);

    fs::write(&path, capture.as_bytes()).map_err(|source| Error::Archive {
        path: path.clone(),
        source,
    })?;

    debug!("wrote {} bytes to {}", capture.len(), path.display());
    Ok(path)
}
