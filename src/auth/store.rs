//! Persisted session snapshot.
//!
//! Two string entries in durable storage: the raw bearer token and the
//! serialized user profile. They are written and cleared together; the
//! transient status/error fields of the state machine are never persisted.

use anyhow::Result;
use tracing::{debug, warn};

use crate::auth::state::Session;
use crate::models::User;
use crate::storage::KeyValueStorage;

const TOKEN_KEY: &str = "token";
const USER_KEY: &str = "user";

/// Source of truth for the session at process start.
pub struct SessionStore {
    storage: Box<dyn KeyValueStorage>,
}

impl SessionStore {
    pub fn new(storage: Box<dyn KeyValueStorage>) -> Self {
        Self { storage }
    }

    /// Load the persisted snapshot. Missing or malformed entries mean "no
    /// session", never an error.
    pub fn load(&self) -> Option<Session> {
        let token = self.storage.get(TOKEN_KEY)?;
        let raw_user = self.storage.get(USER_KEY)?;
        match serde_json::from_str::<User>(&raw_user) {
            Ok(user) => Some(Session::new(token, user)),
            Err(e) => {
                debug!(error = %e, "Stored user profile is malformed; treating as no session");
                None
            }
        }
    }

    /// Persist both entries. Profile first, token last: a stored token is
    /// never observable without its profile.
    pub fn save(&self, session: &Session) -> Result<()> {
        let user = serde_json::to_string(&session.user)?;
        self.storage.set(USER_KEY, &user)?;
        self.storage.set(TOKEN_KEY, &session.token)?;
        Ok(())
    }

    /// Remove both entries. Idempotent; failures are logged, never raised.
    pub fn clear(&self) {
        // Token first: the reverse of `save`, same observable atomicity.
        if let Err(e) = self.storage.remove(TOKEN_KEY) {
            warn!(error = %e, "Failed to remove stored token");
        }
        if let Err(e) = self.storage.remove(USER_KEY) {
            warn!(error = %e, "Failed to remove stored user profile");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    fn store() -> SessionStore {
        SessionStore::new(Box::new(MemoryStorage::new()))
    }

    fn session(token: &str) -> Session {
        Session::new(
            token.to_string(),
            User {
                user_id: 1,
                username: "alice".to_string(),
                email: "alice@example.com".to_string(),
                first_name: None,
                last_name: None,
            },
        )
    }

    #[test]
    fn test_load_returns_last_saved_pair() {
        let store = store();
        assert!(store.load().is_none());

        store.save(&session("T1")).expect("Failed to save");
        assert_eq!(store.load().expect("Expected a session").token, "T1");

        store.save(&session("T2")).expect("Failed to save");
        assert_eq!(store.load().expect("Expected a session").token, "T2");
    }

    #[test]
    fn test_clear_empties_and_is_idempotent() {
        let store = store();
        store.save(&session("T1")).expect("Failed to save");

        store.clear();
        assert!(store.load().is_none());

        store.clear();
        assert!(store.load().is_none());
    }

    #[test]
    fn test_malformed_user_is_treated_as_absent() {
        let storage = MemoryStorage::new();
        storage.set("token", "T1").expect("Failed to set");
        storage.set("user", "{not valid json").expect("Failed to set");

        let store = SessionStore::new(Box::new(storage));
        assert!(store.load().is_none());
    }

    #[test]
    fn test_token_without_user_is_treated_as_absent() {
        let storage = MemoryStorage::new();
        storage.set("token", "T1").expect("Failed to set");

        let store = SessionStore::new(Box::new(storage));
        assert!(store.load().is_none());
    }
}
