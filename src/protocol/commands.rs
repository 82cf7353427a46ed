//! Module `commands`
//!
//! Defines the control-command parsing logic and related data structures
//! used to represent commands, their status, and results.

/// Represents a control command parsed from client input.
///
/// Commands that require arguments carry them in the variant.
#[derive(Debug, PartialEq)]
pub enum Command {
    Quit,
    Logout,
    /// Username for login
    User(String),
    /// Password for login
    Pass(String),
    /// Upload: payload size, overwrite flag, logical target path
    Stor {
        path: String,
        size: u64,
        overwrite: bool,
    },
    /// Existence query for a logical path
    Stat(String),
    /// Unknown or unsupported command
    Unknown,
}

/// Represents the outcome status of executing a command.
pub enum CommandStatus {
    Success,
    Failure(String),
    CloseConnection,
}

/// Struct encapsulating the full result of a command execution.
pub struct CommandResult {
    pub status: CommandStatus,
    pub message: Option<String>,
}

/// Parses a raw command line received from a client into the `Command` enum.
///
/// Validates required arguments and returns `Unknown` if a known command is
/// misused.
pub fn parse_command(raw: &str) -> Command {
    let trimmed = raw.trim();
    let mut parts = trimmed.splitn(2, char::is_whitespace);
    let cmd = parts.next().unwrap_or("").to_ascii_uppercase();
    let arg = parts.next().unwrap_or("").trim();

    match cmd.as_str() {
        "QUIT" | "Q" => Command::Quit,
        "LOGOUT" => Command::Logout,
        "USER" if !arg.is_empty() => Command::User(arg.to_string()),
        "PASS" if !arg.is_empty() => Command::Pass(arg.to_string()),
        "STAT" if !arg.is_empty() => Command::Stat(arg.to_string()),
        "STOR" if !arg.is_empty() => parse_stor(arg),
        _ => Command::Unknown,
    }
}

/// STOR grammar: `STOR <size> <0|1> <path>`. The path comes last so it may
/// contain spaces.
fn parse_stor(arg: &str) -> Command {
    let mut parts = arg.splitn(3, char::is_whitespace);

    let size = parts.next().and_then(|s| s.parse::<u64>().ok());
    let overwrite = match parts.next() {
        Some("0") => Some(false),
        Some("1") => Some(true),
        _ => None,
    };
    let path = parts.next().map(str::trim).filter(|p| !p.is_empty());

    match (size, overwrite, path) {
        (Some(size), Some(overwrite), Some(path)) => Command::Stor {
            path: path.to_string(),
            size,
            overwrite,
        },
        _ => Command::Unknown,
    }
}
