//! Upload pipeline
//!
//! Request/outcome types and the per-request decision state machine.

pub mod handler;
pub mod results;

pub use handler::process_upload;
pub use results::{UploadOutcome, UploadRequest};
