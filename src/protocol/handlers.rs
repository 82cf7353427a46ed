//! Command handlers module for the file server.
//!
//! This module defines handler functions for control commands, handling
//! authentication, existence queries, and session teardown per client
//! connection. The STOR payload exchange lives in the session loop, which
//! owns the stream.

use log::{error, info};

use crate::auth;
use crate::auth::UserRegistry;
use crate::config::ServerConfig;
use crate::protocol::responses::{self, format_response};
use crate::protocol::{Command, CommandResult, CommandStatus};
use crate::session::Session;

/// Dispatches a received command to its corresponding handler.
///
/// # Arguments
///
/// * `session` - Mutable reference to the session issuing the command.
/// * `command` - Reference to the parsed command enum.
/// * `registry` - Configured user registry.
///
/// # Returns
///
/// * `CommandResult` - Result of the command execution, including status and message.
pub fn handle_command(
    session: &mut Session,
    command: &Command,
    registry: &UserRegistry,
    config: &ServerConfig,
) -> CommandResult {
    match command {
        Command::Quit => handle_cmd_quit(session),
        Command::Logout => handle_cmd_logout(session),
        Command::User(username) => handle_cmd_user(session, registry, username, config),
        Command::Pass(password) => handle_cmd_pass(session, registry, password, config),
        Command::Stat(path) => handle_cmd_stat(session, path),
        // The session loop intercepts STOR before dispatch; reaching this
        // arm means the payload exchange was skipped.
        Command::Stor { .. } => CommandResult {
            status: CommandStatus::Failure("Bad command sequence".into()),
            message: Some(format_response(
                responses::UNKNOWN_COMMAND,
                "Bad command sequence",
            )),
        },
        Command::Unknown => handle_cmd_unknown(),
    }
}

/// Restricted dispatch used before login: only USER, PASS, and QUIT are
/// accepted.
pub fn handle_auth_command(
    session: &mut Session,
    command: &Command,
    registry: &UserRegistry,
    config: &ServerConfig,
) -> CommandResult {
    match command {
        Command::User(username) => handle_cmd_user(session, registry, username, config),
        Command::Pass(password) => handle_cmd_pass(session, registry, password, config),
        Command::Quit => handle_cmd_quit(session),
        _ => CommandResult {
            status: CommandStatus::Failure("Authentication required".into()),
            message: Some(format_response(
                responses::AUTH_FAILED,
                "Please login with USER and PASS",
            )),
        },
    }
}

/// Handles the QUIT command: logs out the session and signals connection close.
fn handle_cmd_quit(session: &mut Session) -> CommandResult {
    session.logout();

    CommandResult {
        status: CommandStatus::CloseConnection,
        message: Some(format_response(responses::GOODBYE, "Goodbye")),
    }
}

/// Handles the USER command: validates username and sets session state accordingly.
fn handle_cmd_user(
    session: &mut Session,
    registry: &UserRegistry,
    username: &str,
    config: &ServerConfig,
) -> CommandResult {
    match auth::validate_user(registry, username, config) {
        Ok(()) => {
            session.set_user_valid(true);
            session.set_logged_in(false);
            session.set_username(Some(username.to_string()));
            CommandResult {
                status: CommandStatus::Success,
                message: Some(format_response(
                    responses::PASSWORD_REQUIRED,
                    "Password required",
                )),
            }
        }
        Err(e) => {
            session.set_user_valid(false);
            session.set_logged_in(false);
            session.set_username(None);
            CommandResult {
                status: CommandStatus::Failure(e.to_string()),
                message: Some(format_response(e.reply_code(), &e.to_string())),
            }
        }
    }
}

/// Handles the PASS command: validates password if username was previously
/// validated, and binds the user's provider to the session on success.
fn handle_cmd_pass(
    session: &mut Session,
    registry: &UserRegistry,
    password: &str,
    config: &ServerConfig,
) -> CommandResult {
    if session.is_user_valid() {
        if let Some(username) = session.username().cloned() {
            match auth::validate_password(registry, &username, password, config) {
                Ok(()) => {
                    // Binding point: the session observes this one provider
                    // instance until logout or disconnect.
                    match registry.get(&username) {
                        Some(user) => session.bind_provider(user.provider()),
                        None => {
                            error!("User {} vanished from registry after validation", username);
                            return CommandResult {
                                status: CommandStatus::Failure("Internal error".into()),
                                message: Some(format_response(
                                    responses::ACTION_ABORTED,
                                    "Internal server error",
                                )),
                            };
                        }
                    }
                    session.set_logged_in(true);
                    info!("User {} logged in", username);
                    return CommandResult {
                        status: CommandStatus::Success,
                        message: Some(format_response(
                            responses::LOGIN_SUCCESS,
                            "Login successful",
                        )),
                    };
                }
                Err(e) => {
                    session.set_logged_in(false);
                    return CommandResult {
                        status: CommandStatus::Failure(e.to_string()),
                        message: Some(format_response(e.reply_code(), &e.to_string())),
                    };
                }
            }
        }
    }
    // Username not set or invalid
    CommandResult {
        status: CommandStatus::Failure("Username not provided".into()),
        message: Some(format_response(
            responses::AUTH_FAILED,
            "Please enter the username first",
        )),
    }
}

/// Handles the STAT command: reports whether a logical path currently has
/// stored content, through the session's bound provider.
fn handle_cmd_stat(session: &mut Session, path: &str) -> CommandResult {
    if !session.is_logged_in() {
        return CommandResult {
            status: CommandStatus::Failure("Not logged in".into()),
            message: Some(format_response(responses::AUTH_FAILED, "Not logged in")),
        };
    }

    let provider = match session.provider() {
        Some(provider) => provider,
        None => {
            error!("Logged-in session has no bound provider");
            return CommandResult {
                status: CommandStatus::Failure("Internal error".into()),
                message: Some(format_response(
                    responses::ACTION_ABORTED,
                    "Internal server error",
                )),
            };
        }
    };

    match provider.exists(path) {
        Ok(true) => CommandResult {
            status: CommandStatus::Success,
            message: Some(format_response(
                responses::FILE_STATUS,
                &format!("{} exists", path),
            )),
        },
        Ok(false) => CommandResult {
            status: CommandStatus::Failure("File not found".into()),
            message: Some(format_response(
                responses::FILE_UNAVAILABLE,
                &format!("{}: File not found", path),
            )),
        },
        Err(e) => {
            error!("STAT {} failed: {}", path, e);
            CommandResult {
                status: CommandStatus::Failure(e.to_string()),
                message: Some(format_response(
                    responses::ACTION_ABORTED,
                    &format!("Requested action aborted: {}", e),
                )),
            }
        }
    }
}

/// Handles the LOGOUT command: logs out the session if currently logged in.
fn handle_cmd_logout(session: &mut Session) -> CommandResult {
    if session.is_logged_in() {
        session.logout();
        CommandResult {
            status: CommandStatus::Success,
            message: Some(format_response(responses::GOODBYE, "Logout successful")),
        }
    } else {
        CommandResult {
            status: CommandStatus::Failure("Not logged in".into()),
            message: Some(format_response(responses::AUTH_FAILED, "Not logged in")),
        }
    }
}

fn handle_cmd_unknown() -> CommandResult {
    CommandResult {
        status: CommandStatus::Failure("Unknown command".into()),
        message: Some(format_response(responses::UNKNOWN_COMMAND, "Unknown command")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ServerConfig;
    use crate::protocol::parse_command;

    fn setup() -> (Session, UserRegistry, ServerConfig) {
        let config = ServerConfig::default();
        let registry = UserRegistry::from_config(&config.users).unwrap();
        (Session::default(), registry, config)
    }

    fn login(session: &mut Session, registry: &UserRegistry, config: &ServerConfig, user: &str) {
        let pass = format!("{}123", user);
        handle_auth_command(session, &parse_command(&format!("USER {}", user)), registry, config);
        handle_auth_command(session, &parse_command(&format!("PASS {}", pass)), registry, config);
    }

    #[test]
    fn login_binds_provider() {
        let (mut session, registry, config) = setup();
        assert!(session.provider().is_none());

        login(&mut session, &registry, &config, "alice");
        assert!(session.is_logged_in());
        assert!(session.provider().is_some());
        assert_eq!(session.provider().unwrap().label(), "direct");
    }

    #[test]
    fn mapped_user_gets_mapped_provider() {
        let (mut session, registry, config) = setup();
        login(&mut session, &registry, &config, "bob");
        assert_eq!(session.provider().unwrap().label(), "mapped");
    }

    #[test]
    fn pass_without_user_is_rejected() {
        let (mut session, registry, config) = setup();
        let result =
            handle_auth_command(&mut session, &parse_command("PASS x"), &registry, &config);
        assert!(matches!(result.status, CommandStatus::Failure(_)));
        assert!(!session.is_logged_in());
    }

    #[test]
    fn wrong_password_leaves_session_unbound() {
        let (mut session, registry, config) = setup();
        handle_auth_command(&mut session, &parse_command("USER alice"), &registry, &config);
        let result =
            handle_auth_command(&mut session, &parse_command("PASS nope"), &registry, &config);
        assert!(matches!(result.status, CommandStatus::Failure(_)));
        assert!(session.provider().is_none());
    }

    #[test]
    fn stat_requires_login() {
        let (mut session, registry, config) = setup();
        let result = handle_command(&mut session, &parse_command("STAT a.txt"), &registry, &config);
        assert!(matches!(result.status, CommandStatus::Failure(_)));
    }

    #[test]
    fn logout_clears_binding() {
        let (mut session, registry, config) = setup();
        login(&mut session, &registry, &config, "alice");
        let result =
            handle_command(&mut session, &parse_command("LOGOUT"), &registry, &config);
        assert!(matches!(result.status, CommandStatus::Success));
        assert!(session.provider().is_none());
    }
}
