//! Error handling
//!
//! Domain-specific error types shared across the server modules.

pub mod types;

pub use types::{AuthError, ProviderError, RegistryError, ServerError};
