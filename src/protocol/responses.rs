//! Response handling
//!
//! Defines numeric reply codes and formatting, including the one-to-one
//! mapping from upload outcomes to protocol replies.

use crate::upload::UploadOutcome;

/// Standard reply codes
pub const OPENING_DATA: u16 = 150;
pub const OK: u16 = 200;
pub const FILE_STATUS: u16 = 213;
pub const READY: u16 = 220;
pub const GOODBYE: u16 = 221;
pub const TRANSFER_COMPLETE: u16 = 226;
pub const LOGIN_SUCCESS: u16 = 230;
pub const PASSWORD_REQUIRED: u16 = 331;
pub const SERVICE_UNAVAILABLE: u16 = 421;
pub const ACTION_ABORTED: u16 = 451;
pub const UNKNOWN_COMMAND: u16 = 500;
pub const AUTH_FAILED: u16 = 530;
pub const FILE_UNAVAILABLE: u16 = 550;
pub const EXCEEDED_STORAGE: u16 = 552;

/// Format a reply line
pub fn format_response(code: u16, message: &str) -> String {
    format!("{} {}\r\n", code, message)
}

/// Maps an upload outcome onto its protocol reply.
///
/// Reply codes correspond one-to-one with the outcome variants; the
/// transport never folds a provider failure into a success or a
/// file-exists rejection.
pub fn upload_response(path: &str, outcome: &UploadOutcome) -> String {
    match outcome {
        UploadOutcome::Success => format_response(TRANSFER_COMPLETE, "Transfer complete"),
        UploadOutcome::AlreadyExists => format_response(
            FILE_UNAVAILABLE,
            &format!("{}: File already exists", path),
        ),
        UploadOutcome::Other(e) => format_response(
            ACTION_ABORTED,
            &format!("Requested action aborted: {}", e),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProviderError;

    #[test]
    fn formats_reply_lines() {
        assert_eq!(format_response(READY, "ready"), "220 ready\r\n");
    }

    #[test]
    fn maps_outcomes_one_to_one() {
        assert!(upload_response("a.txt", &UploadOutcome::Success).starts_with("226 "));
        assert!(upload_response("a.txt", &UploadOutcome::AlreadyExists).starts_with("550 "));
        let other = UploadOutcome::Other(ProviderError::InvalidPath("a".into()));
        assert!(upload_response("a.txt", &other).starts_with("451 "));
    }
}
