//! Control protocol
//!
//! Command parsing, reply formatting, and per-command handlers.

pub mod commands;
pub mod handlers;
pub mod responses;

pub use commands::{Command, CommandResult, CommandStatus, parse_command};
pub use handlers::{handle_auth_command, handle_command};
