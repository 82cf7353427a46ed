//! Authentication validator
//!
//! Implements user authentication logic, including username and password
//! validation against the configured registry.

use crate::auth::registry::UserRegistry;
use crate::config::ServerConfig;
use crate::error::AuthError;

/// Performs basic input sanitation to check for malicious or malformed usernames/passwords.
fn is_valid_input(input: &str, max_length: usize) -> bool {
    !input.trim().is_empty() && input.len() <= max_length && !input.contains(['\r', '\n', '\0'])
}

/// Validates that the given username exists in the registry.
pub fn validate_user(
    registry: &UserRegistry,
    username: &str,
    config: &ServerConfig,
) -> Result<(), AuthError> {
    // Check for invalid username characters/format
    if username.contains(['@', '#', ',', '%']) || username.starts_with(char::is_numeric) {
        return Err(AuthError::InvalidUsername(username.to_string()));
    }

    if !is_valid_input(username, config.max_username_length) {
        return Err(AuthError::MalformedInput("Invalid username format".into()));
    }

    if registry.contains(username) {
        Ok(())
    } else {
        Err(AuthError::UserNotFound(username.to_string()))
    }
}

/// Validates that the provided password matches the stored password for the username.
pub fn validate_password(
    registry: &UserRegistry,
    username: &str,
    password: &str,
    config: &ServerConfig,
) -> Result<(), AuthError> {
    if !is_valid_input(password, config.max_username_length) {
        return Err(AuthError::MalformedInput("Invalid password format".into()));
    }

    match registry.get(username) {
        Some(user) if user.password() == password => Ok(()),
        Some(_) => Err(AuthError::InvalidPassword(username.to_string())),
        None => Err(AuthError::UserNotFound(username.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ServerConfig;

    fn setup() -> (UserRegistry, ServerConfig) {
        let config = ServerConfig::default();
        let registry = UserRegistry::from_config(&config.users).unwrap();
        (registry, config)
    }

    #[test]
    fn accepts_known_user() {
        let (registry, config) = setup();
        assert!(validate_user(&registry, "alice", &config).is_ok());
    }

    #[test]
    fn rejects_unknown_user() {
        let (registry, config) = setup();
        assert!(matches!(
            validate_user(&registry, "mallory", &config),
            Err(AuthError::UserNotFound(_))
        ));
    }

    #[test]
    fn rejects_malformed_usernames() {
        let (registry, config) = setup();
        assert!(matches!(
            validate_user(&registry, "al@ce", &config),
            Err(AuthError::InvalidUsername(_))
        ));
        assert!(matches!(
            validate_user(&registry, "1alice", &config),
            Err(AuthError::InvalidUsername(_))
        ));
        assert!(matches!(
            validate_user(&registry, "a\r\nb", &config),
            Err(AuthError::MalformedInput(_))
        ));
    }

    #[test]
    fn validates_passwords() {
        let (registry, config) = setup();
        assert!(validate_password(&registry, "alice", "alice123", &config).is_ok());
        assert!(matches!(
            validate_password(&registry, "alice", "wrong", &config),
            Err(AuthError::InvalidPassword(_))
        ));
        assert!(matches!(
            validate_password(&registry, "mallory", "x", &config),
            Err(AuthError::UserNotFound(_))
        ));
    }
}
