//! Configuration management
//!
//! Every tunable lives in an explicit `ServerConfig` handed to the server at
//! startup; there are no process-wide configuration singletons. The user
//! list carries, per account, the physical root and the provider variant
//! backing it.

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

use crate::provider::ProviderKind;

/// Complete server configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// IP address to bind the control connection
    pub bind_address: String,

    /// Port for the control connection; 0 binds an ephemeral port
    pub control_port: u16,

    /// Maximum concurrent authenticated sessions
    pub max_clients: usize,

    /// Maximum accepted control line length
    pub max_command_length: usize,

    /// Maximum username/password length accepted during login
    pub max_username_length: usize,

    /// Maximum upload size in MB
    pub max_file_size_mb: u64,

    /// Accounts served by this instance
    pub users: Vec<UserSpec>,
}

/// One configured account: credentials, physical root, provider variant.
#[derive(Debug, Deserialize, Clone)]
pub struct UserSpec {
    pub name: String,
    pub password: String,

    /// Physical directory backing this user's logical root
    pub root: String,

    pub provider: ProviderKind,

    /// Mount table for the mapped provider; must be empty for direct
    #[serde(default)]
    pub mounts: Vec<MountSpec>,
}

/// One mount-table entry for a mapped-provider user.
#[derive(Debug, Deserialize, Clone)]
pub struct MountSpec {
    pub logical: String,
    pub physical: String,
}

impl Default for ServerConfig {
    /// Demo configuration mirroring the two-user setup this server exists
    /// to exercise: one direct and one mapped user over the same root.
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1".to_string(),
            control_port: 2121,
            max_clients: 10,
            max_command_length: 512,
            max_username_length: 64,
            max_file_size_mb: 100,
            users: vec![
                UserSpec {
                    name: "alice".to_string(),
                    password: "alice123".to_string(),
                    root: "./server_root".to_string(),
                    provider: ProviderKind::Direct,
                    mounts: Vec::new(),
                },
                UserSpec {
                    name: "bob".to_string(),
                    password: "bob123".to_string(),
                    root: "./server_root".to_string(),
                    provider: ProviderKind::Mapped,
                    mounts: Vec::new(),
                },
            ],
        }
    }
}

impl ServerConfig {
    /// Load configuration from config.toml with environment overrides
    pub fn load() -> Result<Self, ConfigError> {
        // Container deployments mount the config beside the binary; local
        // development reads ./config.toml
        let config_paths = ["strata-file-server/config", "config"];

        let mut last_error = None;

        for config_path in &config_paths {
            match Config::builder()
                .add_source(File::with_name(config_path))
                .add_source(Environment::with_prefix("STRATA").separator("_"))
                .build()
            {
                Ok(settings) => {
                    let config: ServerConfig = settings.try_deserialize()?;
                    config.validate()?;
                    return Ok(config);
                }
                Err(e) => {
                    last_error = Some(e);
                    continue;
                }
            }
        }

        Err(last_error
            .unwrap_or_else(|| ConfigError::Message("no configuration source found".into())))
    }

    /// Validation for all configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_clients == 0 {
            return Err(ConfigError::Message(
                "max_clients must be greater than 0".into(),
            ));
        }

        if self.max_command_length == 0 {
            return Err(ConfigError::Message(
                "max_command_length must be greater than 0".into(),
            ));
        }

        if self.max_username_length == 0 {
            return Err(ConfigError::Message(
                "max_username_length must be greater than 0".into(),
            ));
        }

        if self.max_file_size_mb == 0 {
            return Err(ConfigError::Message(
                "max_file_size_mb must be greater than 0".into(),
            ));
        }

        if self.users.is_empty() {
            return Err(ConfigError::Message(
                "at least one user must be configured".into(),
            ));
        }

        let mut seen = std::collections::HashSet::new();
        for user in &self.users {
            if user.name.is_empty() {
                return Err(ConfigError::Message("user name cannot be empty".into()));
            }
            if user.root.is_empty() {
                return Err(ConfigError::Message(format!(
                    "user {} has an empty root",
                    user.name
                )));
            }
            if !seen.insert(user.name.as_str()) {
                return Err(ConfigError::Message(format!(
                    "duplicate user name: {}",
                    user.name
                )));
            }
            if user.provider == ProviderKind::Direct && !user.mounts.is_empty() {
                return Err(ConfigError::Message(format!(
                    "user {} is direct but declares mounts",
                    user.name
                )));
            }
            for mount in &user.mounts {
                if mount.logical.is_empty() || mount.physical.is_empty() {
                    return Err(ConfigError::Message(format!(
                        "user {} has an incomplete mount entry",
                        user.name
                    )));
                }
                if mount.logical.contains("..") {
                    return Err(ConfigError::Message(format!(
                        "user {} mount prefix contains traversal: {}",
                        user.name, mount.logical
                    )));
                }
            }
        }

        Ok(())
    }

    /// Get bind address and control port as socket address
    pub fn control_socket(&self) -> String {
        format!("{}:{}", self.bind_address, self.control_port)
    }

    /// Get maximum file size in bytes
    pub fn max_file_size_bytes(&self) -> u64 {
        self.max_file_size_mb * 1024 * 1024
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_validates() {
        assert!(ServerConfig::default().validate().is_ok());
    }

    #[test]
    fn rejects_duplicate_user_names() {
        let mut config = ServerConfig::default();
        config.users[1].name = config.users[0].name.clone();
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_mounts_on_direct_user() {
        let mut config = ServerConfig::default();
        config.users[0].mounts.push(MountSpec {
            logical: "/archive".to_string(),
            physical: "./archive_root".to_string(),
        });
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_zero_limits() {
        let mut config = ServerConfig::default();
        config.max_file_size_mb = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_traversal_in_mount_prefix() {
        let mut config = ServerConfig::default();
        config.users[1].mounts.push(MountSpec {
            logical: "/../outside".to_string(),
            physical: "./mnt".to_string(),
        });
        assert!(config.validate().is_err());
    }
}
