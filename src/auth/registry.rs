//! User registry
//!
//! Accounts and their bound providers, built once from configuration at
//! startup. The registry instance is owned by the server and shared
//! read-only across sessions; there is no static credential store.

use std::collections::HashMap;
use std::sync::Arc;

use crate::config::UserSpec;
use crate::error::RegistryError;
use crate::provider::{self, FilesystemProvider};

/// A configured account and the filesystem provider bound to it.
///
/// Created at server configuration time; immutable for the process
/// lifetime.
pub struct User {
    name: String,
    password: String,
    provider: Arc<dyn FilesystemProvider>,
}

impl User {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn password(&self) -> &str {
        &self.password
    }

    /// Registration-time provider instance; sessions clone this handle at
    /// login.
    pub fn provider(&self) -> Arc<dyn FilesystemProvider> {
        Arc::clone(&self.provider)
    }
}

/// All accounts served by this instance.
pub struct UserRegistry {
    users: HashMap<String, User>,
}

impl UserRegistry {
    /// Builds every user and provider described by the configuration.
    pub fn from_config(specs: &[UserSpec]) -> Result<Self, RegistryError> {
        if specs.is_empty() {
            return Err(RegistryError::EmptyUserList);
        }

        let mut users = HashMap::new();
        for spec in specs {
            if users.contains_key(&spec.name) {
                return Err(RegistryError::DuplicateUser(spec.name.clone()));
            }
            let user = User {
                name: spec.name.clone(),
                password: spec.password.clone(),
                provider: provider::from_spec(spec),
            };
            users.insert(spec.name.clone(), user);
        }

        Ok(Self { users })
    }

    pub fn get(&self, name: &str) -> Option<&User> {
        self.users.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.users.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ServerConfig;

    #[test]
    fn builds_users_from_config() {
        let config = ServerConfig::default();
        let registry = UserRegistry::from_config(&config.users).unwrap();
        assert_eq!(registry.len(), 2);
        assert!(registry.contains("alice"));
        assert_eq!(registry.get("bob").unwrap().name(), "bob");
        assert!(registry.get("mallory").is_none());
    }

    #[test]
    fn rejects_duplicate_users() {
        let mut config = ServerConfig::default();
        config.users[1].name = "alice".to_string();
        assert!(matches!(
            UserRegistry::from_config(&config.users),
            Err(RegistryError::DuplicateUser(_))
        ));
    }

    #[test]
    fn rejects_empty_user_list() {
        assert!(matches!(
            UserRegistry::from_config(&[]),
            Err(RegistryError::EmptyUserList)
        ));
    }
}
