//! Storage primitives
//!
//! Shared stat and write primitives used by every provider variant.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::ProviderError;

/// Stats a physical path; a missing entry is `Ok(false)`, any other I/O
/// failure is an error, never "does not exist".
pub(crate) fn stat_exists(physical: &Path) -> Result<bool, ProviderError> {
    match fs::metadata(physical) {
        Ok(_) => Ok(true),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(ProviderError::IoError(e)),
    }
}

/// Temporary path a payload is staged at while being persisted.
pub(crate) fn temp_path(physical: &Path) -> PathBuf {
    physical.with_extension(format!(
        "{}.tmp",
        physical
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or("")
    ))
}

/// Persists `data` at `physical` by writing a temp file and renaming it into
/// place. The destination is never visible half-written; a failed attempt
/// removes its temp file.
pub(crate) fn write_atomic(physical: &Path, data: &[u8]) -> Result<(), ProviderError> {
    let temp = temp_path(physical);

    let mut temp_file = File::create(&temp)?;

    if let Err(e) = temp_file.write_all(data) {
        let _ = fs::remove_file(&temp);
        return Err(ProviderError::IoError(e));
    }

    if let Err(e) = temp_file.flush() {
        let _ = fs::remove_file(&temp);
        return Err(ProviderError::IoError(e));
    }

    drop(temp_file);

    if let Err(e) = fs::rename(&temp, physical) {
        let _ = fs::remove_file(&temp);
        return Err(ProviderError::IoError(e));
    }

    Ok(())
}
