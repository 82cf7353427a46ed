//! Upload decision pipeline
//!
//! Drives a single upload request through its phases against the session's
//! bound provider. Provider failures during resolution or the existence
//! check surface as `Other`, never as a missing file.

use log::{debug, error, info};

use crate::provider::FilesystemProvider;
use crate::upload::results::{UploadOutcome, UploadRequest};

/// Phases of a single upload request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum UploadPhase {
    Received,
    Resolving,
    Checking,
    Writing,
    Rejecting,
    Terminal,
}

fn enter(phase: UploadPhase, path: &str) {
    debug!("upload {}: entering {:?}", path, phase);
}

/// Runs the upload state machine for one request.
///
/// `Received -> Resolving -> Checking -> {Writing | Rejecting} -> Terminal`.
/// A rejection writes no bytes and has no side effects.
pub fn process_upload(
    provider: &dyn FilesystemProvider,
    request: &UploadRequest,
) -> UploadOutcome {
    enter(UploadPhase::Received, &request.path);

    enter(UploadPhase::Resolving, &request.path);
    let physical = match provider.resolve(&request.path) {
        Ok(physical) => physical,
        Err(e) => {
            error!("upload {}: resolution failed: {}", request.path, e);
            enter(UploadPhase::Terminal, &request.path);
            return UploadOutcome::Other(e);
        }
    };

    enter(UploadPhase::Checking, &request.path);
    let exists = match provider.exists(&request.path) {
        Ok(exists) => exists,
        Err(e) => {
            error!("upload {}: existence check failed: {}", request.path, e);
            enter(UploadPhase::Terminal, &request.path);
            return UploadOutcome::Other(e);
        }
    };

    if exists && !request.overwrite {
        enter(UploadPhase::Rejecting, &request.path);
        info!(
            "upload {} ({}): rejected, target exists and overwrite disallowed",
            request.path,
            provider.label()
        );
        enter(UploadPhase::Terminal, &request.path);
        return UploadOutcome::AlreadyExists;
    }

    enter(UploadPhase::Writing, &request.path);
    let outcome = provider.write(&request.path, &request.data, request.overwrite);
    match &outcome {
        UploadOutcome::Success => info!(
            "upload {} ({}): stored {} bytes at {}",
            request.path,
            provider.label(),
            request.data.len(),
            physical.display()
        ),
        UploadOutcome::AlreadyExists => info!(
            "upload {} ({}): target appeared before write completed",
            request.path,
            provider.label()
        ),
        UploadOutcome::Other(e) => {
            error!("upload {}: write failed: {}", request.path, e)
        }
    }
    enter(UploadPhase::Terminal, &request.path);
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::DirectPathProvider;
    use std::fs;

    fn request(path: &str, data: &[u8], overwrite: bool) -> UploadRequest {
        UploadRequest {
            path: path.to_string(),
            data: data.to_vec(),
            overwrite,
        }
    }

    #[test]
    fn first_write_succeeds_duplicate_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let provider = DirectPathProvider::new(dir.path());

        let first = process_upload(&provider, &request("a.txt", b"one", false));
        assert!(first.is_success());

        let second = process_upload(&provider, &request("a.txt", b"two", false));
        assert!(second.is_already_exists());

        // Rejection wrote nothing
        assert_eq!(fs::read(dir.path().join("a.txt")).unwrap(), b"one");
    }

    #[test]
    fn overwrite_replaces_content() {
        let dir = tempfile::tempdir().unwrap();
        let provider = DirectPathProvider::new(dir.path());

        assert!(process_upload(&provider, &request("a.txt", b"one", true)).is_success());
        assert!(process_upload(&provider, &request("a.txt", b"two", true)).is_success());
        assert_eq!(fs::read(dir.path().join("a.txt")).unwrap(), b"two");
    }

    #[test]
    fn resolution_failure_is_other_not_a_miss() {
        let dir = tempfile::tempdir().unwrap();
        let provider = DirectPathProvider::new(dir.path());

        let outcome = process_upload(&provider, &request("../escape.txt", b"x", false));
        assert!(matches!(outcome, UploadOutcome::Other(_)));
        assert!(!dir.path().parent().unwrap().join("escape.txt").exists());
    }

    #[test]
    fn missing_parent_directory_is_other() {
        let dir = tempfile::tempdir().unwrap();
        let provider = DirectPathProvider::new(dir.path());

        let outcome = process_upload(&provider, &request("sub/dir/a.txt", b"x", false));
        assert!(matches!(outcome, UploadOutcome::Other(_)));
    }

    #[test]
    fn exists_reports_true_after_successful_write() {
        let dir = tempfile::tempdir().unwrap();
        let provider = DirectPathProvider::new(dir.path());

        assert!(process_upload(&provider, &request("b.txt", b"data", false)).is_success());
        assert!(provider.exists("b.txt").unwrap());
    }
}
