//! Upload result types
//!
//! Request and outcome values exchanged between the transport layer and the
//! filesystem providers.

use crate::error::ProviderError;

/// A single upload issued by a client. One instance per STOR command.
#[derive(Debug, Clone)]
pub struct UploadRequest {
    /// Logical target path
    pub path: String,
    /// File payload
    pub data: Vec<u8>,
    /// Whether an existing destination file may be replaced
    pub overwrite: bool,
}

/// Outcome of an upload decision.
///
/// `AlreadyExists` is produced if and only if the existence check confirmed
/// the target at decision time and overwrite was disallowed. Callers branch
/// on the variant, never on message text.
#[derive(Debug)]
pub enum UploadOutcome {
    /// Payload persisted at the target path.
    Success,
    /// Target already exists and overwrite was disallowed; nothing written.
    AlreadyExists,
    /// Resolution, existence check, or I/O failure.
    Other(ProviderError),
}

impl UploadOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, UploadOutcome::Success)
    }

    pub fn is_already_exists(&self) -> bool {
        matches!(self, UploadOutcome::AlreadyExists)
    }

    /// Variant tag used in logs and outcome-sequence comparisons.
    pub fn label(&self) -> &'static str {
        match self {
            UploadOutcome::Success => "success",
            UploadOutcome::AlreadyExists => "already-exists",
            UploadOutcome::Other(_) => "other",
        }
    }
}
