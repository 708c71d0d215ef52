//! Persistence ports used by the services.
//!
//! Each call is atomic on its own. Uniqueness rules (user email, one
//! application per job and worker) are enforced by the implementation so
//! concurrent callers cannot slip a duplicate in between a check and an
//! insert.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::api::application::models::{Application, ApplicationStatus};
use crate::api::auth::models::User;
use crate::api::error::MarketError;
use crate::api::job::models::Job;

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Fails with `DuplicateEmail` if the email is taken.
    async fn insert(&self, user: &User) -> Result<(), MarketError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, MarketError>;

    async fn find_by_id(&self, id: &str) -> Result<Option<User>, MarketError>;

    /// Unknown ids are ignored.
    async fn touch_last_access(&self, id: &str, at: DateTime<Utc>) -> Result<(), MarketError>;

    async fn count(&self) -> Result<usize, MarketError>;
}

#[async_trait]
pub trait JobRepository: Send + Sync {
    /// New jobs go to the front of the collection.
    async fn insert(&self, job: &Job) -> Result<(), MarketError>;

    /// All jobs, newest first.
    async fn list(&self) -> Result<Vec<Job>, MarketError>;

    async fn list_by_client(&self, client_id: &str) -> Result<Vec<Job>, MarketError>;

    async fn find_by_id(&self, id: &str) -> Result<Option<Job>, MarketError>;
}

#[async_trait]
pub trait ApplicationRepository: Send + Sync {
    /// Appends; fails with `DuplicateApplication` if the worker already
    /// applied to the job.
    async fn insert(&self, application: &Application) -> Result<(), MarketError>;

    async fn find_by_id(&self, id: &str) -> Result<Option<Application>, MarketError>;

    /// Insertion order.
    async fn list_by_job(&self, job_id: &str) -> Result<Vec<Application>, MarketError>;

    /// Insertion order.
    async fn list_by_worker(&self, worker_id: &str) -> Result<Vec<Application>, MarketError>;

    /// Atomically move a pending application to `status`.
    ///
    /// Fails with `NotFound` for unknown ids and `InvalidTransition` when
    /// the stored status is no longer `PENDIENTE`.
    async fn update_status(
        &self,
        id: &str,
        status: ApplicationStatus,
    ) -> Result<Application, MarketError>;
}

/// The set of repositories a running service is wired with.
#[derive(Clone)]
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub jobs: Arc<dyn JobRepository>,
    pub applications: Arc<dyn ApplicationRepository>,
}
