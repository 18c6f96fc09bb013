//! Shared application state and session management

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use chrono::Utc;
use civic_ledger::ActorId;

use crate::config::ServiceConfig;
use crate::database::Database;

/// Bearer sessions handed out to the identity provider. Sessions only map a
/// token to an actor id; roles are read from the store on every request.
#[derive(Clone)]
pub struct SessionStore {
    sessions: Arc<Mutex<HashMap<String, Session>>>,
    ttl_seconds: u64,
}

#[derive(Clone, Debug)]
pub struct Session {
    pub user_id: ActorId,
    pub expires_at: i64,
}

impl SessionStore {
    pub fn new(ttl_seconds: u64) -> Self {
        Self {
            sessions: Arc::new(Mutex::new(HashMap::new())),
            ttl_seconds,
        }
    }

    pub fn ttl_seconds(&self) -> u64 {
        self.ttl_seconds
    }

    /// Mint a token for `user_id`.
    pub fn issue(&self, user_id: &str) -> String {
        let token = uuid::Uuid::new_v4().simple().to_string();
        let ttl = i64::try_from(self.ttl_seconds).unwrap_or(i64::MAX);
        let session = Session {
            user_id: user_id.to_string(),
            expires_at: Utc::now().timestamp().saturating_add(ttl),
        };

        let mut sessions = self.sessions.lock().unwrap_or_else(PoisonError::into_inner);
        let now = Utc::now().timestamp();
        sessions.retain(|_, s| now <= s.expires_at);
        sessions.insert(token.clone(), session);
        token
    }

    /// The actor behind a live token. Expired tokens are dropped.
    pub fn resolve(&self, token: &str) -> Option<ActorId> {
        let mut sessions = self.sessions.lock().unwrap_or_else(PoisonError::into_inner);
        let now = Utc::now().timestamp();
        match sessions.get(token) {
            Some(session) if now <= session.expires_at => Some(session.user_id.clone()),
            Some(_) => {
                sessions.remove(token);
                None
            }
            None => None,
        }
    }

    pub fn revoke(&self, token: &str) -> bool {
        self.sessions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(token)
            .is_some()
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub sessions: SessionStore,
    pub config: Arc<ServiceConfig>,
}

impl AppState {
    pub fn new(db: Database, config: ServiceConfig) -> Self {
        Self {
            db,
            sessions: SessionStore::new(config.session_ttl_seconds),
            config: Arc::new(config),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issued_token_resolves_to_user() {
        let store = SessionStore::new(60);
        let token = store.issue("alice");
        assert_eq!(store.resolve(&token).as_deref(), Some("alice"));
        assert_eq!(store.resolve("not-a-token"), None);
    }

    #[test]
    fn tokens_are_unique_per_issue() {
        let store = SessionStore::new(60);
        assert_ne!(store.issue("alice"), store.issue("alice"));
    }

    #[test]
    fn expired_session_is_dropped() {
        let store = SessionStore::new(60);
        let token = store.issue("bob");
        store
            .sessions
            .lock()
            .unwrap()
            .get_mut(&token)
            .unwrap()
            .expires_at = Utc::now().timestamp() - 1;

        assert_eq!(store.resolve(&token), None);
        assert!(!store.revoke(&token));
    }
}
