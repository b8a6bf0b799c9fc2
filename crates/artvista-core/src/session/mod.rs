//! Session token persistence.
//!
//! The signed-in user's ID token is kept under one fixed key in a
//! `TokenStore` (file, OS keychain or memory). `SessionStore` is the handle
//! the authentication wrapper and the route guard share; nothing reads the
//! token from ambient storage.

pub mod store;
pub mod token;

use std::sync::Arc;

use anyhow::Result;
use tracing::debug;

pub use store::{FileTokenStore, KeyringTokenStore, MemoryTokenStore, TokenStore};
pub use token::{encode_unsigned, SessionToken, TokenClaims};

/// Key the bearer token is stored under
pub const TOKEN_KEY: &str = "token";

#[derive(Clone)]
pub struct SessionStore {
    store: Arc<dyn TokenStore>,
}

impl SessionStore {
    pub fn new(store: Arc<dyn TokenStore>) -> Self {
        Self { store }
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryTokenStore::new()))
    }

    pub fn token(&self) -> Result<Option<SessionToken>> {
        Ok(self.store.get(TOKEN_KEY)?.map(SessionToken::from))
    }

    pub fn save(&self, token: &str) -> Result<()> {
        debug!("Persisting session token");
        self.store.set(TOKEN_KEY, token)
    }

    pub fn clear(&self) -> Result<()> {
        debug!("Clearing session token");
        self.store.remove(TOKEN_KEY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_store_uses_fixed_key() {
        let backing = Arc::new(MemoryTokenStore::new());
        let session = SessionStore::new(backing.clone());

        session.save("abc").unwrap();
        assert_eq!(backing.get(TOKEN_KEY).unwrap().as_deref(), Some("abc"));
        assert_eq!(session.token().unwrap(), Some(SessionToken::new("abc")));

        session.clear().unwrap();
        assert_eq!(session.token().unwrap(), None);
    }
}
