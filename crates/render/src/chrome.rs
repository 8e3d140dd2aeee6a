use crate::error::{ErrorKind, Result};
use std::path::{Path, PathBuf};

// TODO: What are the executable names on Windows? macOS?
const EXECUTABLES: [&str; 5] = ["google-chrome", "google-chrome-stable", "chromium", "chromium-browser", "chrome"];

/// Locates the Chrome/Chromium executable.
///
/// An explicitly configured path must exist; otherwise the usual executable
/// names are searched for on `PATH`.
pub(crate) fn discover(explicit: Option<&Path>) -> Result<PathBuf> {
    if let Some(path) = explicit {
        if path.is_file() {
            return Ok(path.to_path_buf());
        }
        tracing::error!(path = %path.display(), "Configured Chrome executable does not exist");
        exn::bail!(ErrorKind::ChromeNotFound);
    }
    for exe in EXECUTABLES {
        if let Ok(path) = which::which(exe) {
            tracing::trace!(path = %path.display(), "Discovered Chrome executable");
            return Ok(path);
        }
    }
    tracing::info!("Chrome executable not found in PATH");
    exn::bail!(ErrorKind::ChromeNotFound);
}
