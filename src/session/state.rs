//! Module `session`
//!
//! Defines the `Session` struct and associated methods to manage per-client
//! state, including authentication status, peer address, and the filesystem
//! provider bound at login.

use std::net::SocketAddr;
use std::sync::Arc;

use crate::provider::FilesystemProvider;

/// Represents the state of one connected client.
///
/// Tracks authentication progress, the peer address, and the provider
/// instance serving this session's requests. The provider is bound when
/// login completes and is never swapped while the session lives; every
/// request on the session observes the same instance.
pub struct Session {
    username: Option<String>,
    peer_addr: Option<SocketAddr>,
    provider: Option<Arc<dyn FilesystemProvider>>,
    is_user_valid: bool,
    is_logged_in: bool,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            username: None,
            peer_addr: None,
            provider: None,
            is_user_valid: false,
            is_logged_in: false,
        }
    }
}

impl Session {
    /// Resets the session, logging out and clearing all stored state,
    /// including the provider binding.
    pub fn logout(&mut self) {
        self.username = None;
        self.peer_addr = None;
        self.provider = None;
        self.is_user_valid = false;
        self.is_logged_in = false;
    }

    // --------------------
    // Getter methods
    // --------------------

    /// Returns whether the username provided by the client was accepted.
    pub fn is_user_valid(&self) -> bool {
        self.is_user_valid
    }

    /// Returns whether the client has successfully logged in.
    pub fn is_logged_in(&self) -> bool {
        self.is_logged_in
    }

    /// Returns the username of the session if set.
    pub fn username(&self) -> Option<&String> {
        self.username.as_ref()
    }

    /// Returns the peer socket address if known.
    pub fn peer_addr(&self) -> Option<&SocketAddr> {
        self.peer_addr.as_ref()
    }

    /// Returns the provider bound to this session, if authenticated.
    pub fn provider(&self) -> Option<Arc<dyn FilesystemProvider>> {
        self.provider.as_ref().map(Arc::clone)
    }

    // --------------------
    // Setter methods
    // --------------------

    /// Sets the validity state of the username.
    pub fn set_user_valid(&mut self, valid: bool) {
        self.is_user_valid = valid;
    }

    /// Sets the login state of the session.
    pub fn set_logged_in(&mut self, logged_in: bool) {
        self.is_logged_in = logged_in;
    }

    /// Sets the username of the session.
    pub fn set_username(&mut self, username: Option<String>) {
        self.username = username;
    }

    /// Sets the peer socket address.
    pub fn set_peer_addr(&mut self, addr: Option<SocketAddr>) {
        self.peer_addr = addr;
    }

    /// Binds the provider serving this session.
    ///
    /// Established once at login from the user's registration-time instance.
    pub fn bind_provider(&mut self, provider: Arc<dyn FilesystemProvider>) {
        self.provider = Some(provider);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::DirectPathProvider;

    #[test]
    fn default_session_is_unauthenticated() {
        let session = Session::default();
        assert!(!session.is_user_valid());
        assert!(!session.is_logged_in());
        assert!(session.provider().is_none());
    }

    #[test]
    fn logout_clears_provider_binding() {
        let mut session = Session::default();
        session.set_username(Some("alice".to_string()));
        session.set_user_valid(true);
        session.set_logged_in(true);
        session.bind_provider(Arc::new(DirectPathProvider::new("/srv/data")));
        assert!(session.provider().is_some());

        session.logout();
        assert!(session.provider().is_none());
        assert!(!session.is_logged_in());
        assert!(session.username().is_none());
    }
}
