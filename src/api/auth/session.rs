use std::collections::HashMap;

use tokio::sync::RwLock;
use tracing::debug;

use super::models::{generate_id, PublicUser, Session};

/// Process-local session registry.
///
/// Sessions are never written to durable storage: they disappear on logout
/// or when the process exits.
#[derive(Default)]
pub struct SessionStore {
    sessions: RwLock<HashMap<String, PublicUser>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn open(&self, user: PublicUser) -> Session {
        let token = generate_id();
        debug!("Opening session for user id={}", user.id);
        self.sessions
            .write()
            .await
            .insert(token.clone(), user.clone());
        Session { token, user }
    }

    pub async fn get(&self, token: &str) -> Option<PublicUser> {
        self.sessions.read().await.get(token).cloned()
    }

    /// Returns whether a session was actually removed.
    pub async fn close(&self, token: &str) -> bool {
        self.sessions.write().await.remove(token).is_some()
    }
}
