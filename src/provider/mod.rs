//! Filesystem providers
//!
//! Abstraction over where files live and how they are tested for existence.
//! A provider instance is bound to a user at configuration time and serves
//! every request on that user's sessions. Both variants must agree on
//! existence and overwrite semantics for the same logical path under the
//! same root; the trait's provided methods route every storage query through
//! `resolve` to keep that agreement structural.

pub mod direct;
pub mod mapped;
pub mod path;
mod store;

pub use direct::DirectPathProvider;
pub use mapped::{MappedProvider, Mount};

use serde::Deserialize;
use std::path::PathBuf;
use std::sync::Arc;

use crate::config::UserSpec;
use crate::error::ProviderError;
use crate::upload::UploadOutcome;

/// Translates logical paths into physical storage operations.
pub trait FilesystemProvider: Send + Sync {
    /// Variant label used in logs.
    fn label(&self) -> &'static str;

    /// Resolves a logical path to the physical location backing it.
    fn resolve(&self, logical: &str) -> Result<PathBuf, ProviderError>;

    /// Queries whether a logical path currently has stored content.
    ///
    /// Resolution runs first, with the same mapping `write` uses; a missing
    /// file is `Ok(false)`, any resolution or I/O failure is an error.
    fn exists(&self, logical: &str) -> Result<bool, ProviderError> {
        let physical = self.resolve(logical)?;
        store::stat_exists(&physical)
    }

    /// Persists `data` at the logical path, honoring the overwrite flag.
    ///
    /// Returns `AlreadyExists` without touching storage when the resolved
    /// target exists and `overwrite` is false. The payload lands through a
    /// temp-file rename, so the destination is never visible half-written.
    fn write(&self, logical: &str, data: &[u8], overwrite: bool) -> UploadOutcome {
        let physical = match self.resolve(logical) {
            Ok(physical) => physical,
            Err(e) => return UploadOutcome::Other(e),
        };

        let exists = match store::stat_exists(&physical) {
            Ok(exists) => exists,
            Err(e) => return UploadOutcome::Other(e),
        };

        if exists && !overwrite {
            return UploadOutcome::AlreadyExists;
        }

        if let Some(parent) = physical.parent() {
            match store::stat_exists(parent) {
                Ok(true) => {}
                Ok(false) => {
                    return UploadOutcome::Other(ProviderError::DirectoryNotFound(
                        parent.to_string_lossy().to_string(),
                    ));
                }
                Err(e) => return UploadOutcome::Other(e),
            }
        }

        // A staging file left by an interrupted or in-flight upload blocks
        // the target until it is cleared.
        match store::stat_exists(&store::temp_path(&physical)) {
            Ok(true) => {
                return UploadOutcome::Other(ProviderError::UploadInProgress(
                    logical.to_string(),
                ));
            }
            Ok(false) => {}
            Err(e) => return UploadOutcome::Other(e),
        }

        match store::write_atomic(&physical, data) {
            Ok(()) => UploadOutcome::Success,
            Err(e) => UploadOutcome::Other(e),
        }
    }
}

/// Provider variant selector used in user configuration.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    Direct,
    Mapped,
}

/// Builds the provider instance described by a configured user.
pub fn from_spec(spec: &UserSpec) -> Arc<dyn FilesystemProvider> {
    match spec.provider {
        ProviderKind::Direct => Arc::new(DirectPathProvider::new(&spec.root)),
        ProviderKind::Mapped => {
            let mounts = spec
                .mounts
                .iter()
                .map(|m| Mount::new(m.logical.as_str(), m.physical.as_str()))
                .collect();
            Arc::new(MappedProvider::new(&spec.root, mounts))
        }
    }
}
