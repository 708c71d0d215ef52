use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};

use crate::api::error::MarketError;
use crate::db::repository::UserRepository;
use super::models::{PublicUser, Registration, Session, User};
use super::password;
use super::session::SessionStore;

/// Registration, login and session handling
#[derive(Clone)]
pub struct IdentityService {
    users: Arc<dyn UserRepository>,
    sessions: Arc<SessionStore>,
    password_cost: u32,
}

impl IdentityService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        sessions: Arc<SessionStore>,
        password_cost: u32,
    ) -> Self {
        Self {
            users,
            sessions,
            password_cost,
        }
    }

    /// Register a new user and open a session for them
    ///
    /// # Returns
    /// - `Ok(Session)` - user stored, session opened
    /// - `Err(MarketError::MissingRequiredField)` - nombres/cedula/email blank
    /// - `Err(MarketError::DuplicateEmail)` - email already registered
    pub async fn register(&self, registration: Registration) -> Result<Session, MarketError> {
        info!(
            "Service: Registering {} user with email={}",
            registration.profile.role(),
            registration.email
        );

        let user = User::new(registration, self.password_cost).await?;
        self.users.insert(&user).await?;

        info!("Service: User registered: {}", user);
        Ok(self.sessions.open(user.public_view()).await)
    }

    /// Check credentials and open a session
    pub async fn login(&self, email: &str, password: &str) -> Result<Session, MarketError> {
        let user = self.users.find_by_email(email).await?;
        let verified = match &user {
            Some(user) => password::verify_password(password, &user.password_hash).await?,
            None => false,
        };
        let Some(user) = user.filter(|_| verified) else {
            warn!("Service: Failed login attempt for email={}", email);
            return Err(MarketError::InvalidCredentials);
        };

        self.users.touch_last_access(&user.id, Utc::now()).await?;

        info!("Service: User logged in: {}", user);
        Ok(self.sessions.open(user.public_view()).await)
    }

    /// The public profile behind `token`, if the session is still open
    pub async fn current_session(&self, token: &str) -> Option<PublicUser> {
        self.sessions.get(token).await
    }

    /// Number of stored users; also used by the health endpoints as a storage round trip
    pub async fn registered_users(&self) -> Result<usize, MarketError> {
        self.users.count().await
    }

    pub async fn logout(&self, token: &str) {
        if self.sessions.close(token).await {
            info!("Service: Session closed");
        }
    }
}
