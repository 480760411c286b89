//! Best-effort release version probe

use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::constants::version::{FILENAME, UNKNOWN};

/// Trimmed contents of a version file, or "unknown" when it cannot be read
pub fn probe_version(path: &Path) -> String {
    match fs::read_to_string(path) {
        Ok(contents) if !contents.trim().is_empty() => contents.trim().to_string(),
        Ok(_) => {
            debug!(path = %path.display(), "Version file is empty");
            UNKNOWN.to_string()
        }
        Err(err) => {
            debug!(path = %path.display(), error = %err, "Version file not readable");
            UNKNOWN.to_string()
        }
    }
}

/// `version.txt` next to the running executable
pub fn version_file_path() -> Option<PathBuf> {
    let exe = std::env::current_exe().ok()?;
    Some(exe.parent()?.join(FILENAME))
}

pub fn app_version() -> String {
    version_file_path()
        .map(|path| probe_version(&path))
        .unwrap_or_else(|| UNKNOWN.to_string())
}
