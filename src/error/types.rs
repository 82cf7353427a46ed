//! Error types
//!
//! Defines domain-specific error types for each module of the file server.

use std::fmt;
use std::io;

/// Authentication module errors
#[derive(Debug)]
pub enum AuthError {
    InvalidUsername(String),
    InvalidPassword(String),
    UserNotFound(String),
    MalformedInput(String),
    NotLoggedIn,
}

impl AuthError {
    /// Numeric reply code sent to the client for this error.
    pub fn reply_code(&self) -> u16 {
        match self {
            AuthError::MalformedInput(_) => 501,
            _ => 530,
        }
    }
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthError::InvalidUsername(u) => write!(f, "Invalid username: {}", u),
            AuthError::InvalidPassword(u) => write!(f, "Invalid password for user: {}", u),
            AuthError::UserNotFound(u) => write!(f, "User not found: {}", u),
            AuthError::MalformedInput(s) => write!(f, "Malformed input: {}", s),
            AuthError::NotLoggedIn => write!(f, "User not logged in"),
        }
    }
}

impl std::error::Error for AuthError {}

/// Filesystem provider errors
///
/// Raised during logical path resolution, existence checks, and writes.
/// Carried inside `UploadOutcome::Other`; compared by variant, never by
/// message text.
#[derive(Debug)]
pub enum ProviderError {
    InvalidPath(String),
    PathTraversal(String),
    DirectoryNotFound(String),
    UploadInProgress(String),
    IoError(io::Error),
}

impl fmt::Display for ProviderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderError::InvalidPath(p) => write!(f, "Invalid path: {}", p),
            ProviderError::PathTraversal(p) => write!(f, "Path traversal attempt: {}", p),
            ProviderError::DirectoryNotFound(p) => write!(f, "Directory not found: {}", p),
            ProviderError::UploadInProgress(p) => {
                write!(f, "Upload already in progress: {}", p)
            }
            ProviderError::IoError(e) => write!(f, "IO error: {}", e),
        }
    }
}

impl std::error::Error for ProviderError {}

impl From<io::Error> for ProviderError {
    fn from(error: io::Error) -> Self {
        ProviderError::IoError(error)
    }
}

/// Configuration errors raised while building the user registry.
#[derive(Debug)]
pub enum RegistryError {
    DuplicateUser(String),
    EmptyUserList,
    Provider(ProviderError),
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegistryError::DuplicateUser(u) => write!(f, "Duplicate user: {}", u),
            RegistryError::EmptyUserList => write!(f, "No users configured"),
            RegistryError::Provider(e) => write!(f, "Provider setup failed: {}", e),
        }
    }
}

impl std::error::Error for RegistryError {}

impl From<ProviderError> for RegistryError {
    fn from(error: ProviderError) -> Self {
        RegistryError::Provider(error)
    }
}

/// General server error that encompasses all error types
#[derive(Debug)]
pub enum ServerError {
    Auth(AuthError),
    Provider(ProviderError),
    Registry(RegistryError),
    IoError(io::Error),
}

impl fmt::Display for ServerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServerError::Auth(e) => write!(f, "Authentication error: {}", e),
            ServerError::Provider(e) => write!(f, "Provider error: {}", e),
            ServerError::Registry(e) => write!(f, "Registry error: {}", e),
            ServerError::IoError(e) => write!(f, "I/O error: {}", e),
        }
    }
}

impl std::error::Error for ServerError {}

impl From<AuthError> for ServerError {
    fn from(error: AuthError) -> Self {
        ServerError::Auth(error)
    }
}

impl From<ProviderError> for ServerError {
    fn from(error: ProviderError) -> Self {
        ServerError::Provider(error)
    }
}

impl From<RegistryError> for ServerError {
    fn from(error: RegistryError) -> Self {
        ServerError::Registry(error)
    }
}

impl From<io::Error> for ServerError {
    fn from(error: io::Error) -> Self {
        ServerError::IoError(error)
    }
}
