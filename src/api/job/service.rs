use std::sync::Arc;

use tracing::{info, warn};

use crate::api::auth::models::{PublicUser, Role};
use crate::api::error::MarketError;
use crate::db::repository::JobRepository;
use super::models::{Job, NewJob};

/// Job service containing business logic
#[derive(Clone)]
pub struct JobService {
    jobs: Arc<dyn JobRepository>,
}

impl JobService {
    /// Create a new JobService instance
    pub fn new(jobs: Arc<dyn JobRepository>) -> Self {
        Self { jobs }
    }

    /// Publish a job on behalf of a client
    ///
    /// # Business Logic
    /// - Only clients may publish
    /// - Owner fields come from the creator, status starts ABIERTO
    /// - Missing fields get their defaults, a bad budget becomes 0
    pub async fn create_job(&self, data: NewJob, creator: &PublicUser) -> Result<Job, MarketError> {
        if creator.role() != Role::Cliente {
            warn!("Service: User {} tried to publish a job as {}", creator.id, creator.role());
            return Err(MarketError::forbidden("solo los clientes pueden publicar trabajos"));
        }

        let job = Job::new(data, creator);
        self.jobs.insert(&job).await?;

        info!("Service: Job created successfully with id={} by client={}", job.id, job.client_id);
        Ok(job)
    }

    /// Open jobs, newest first
    pub async fn list_open_jobs(&self) -> Result<impl Iterator<Item = Job>, MarketError> {
        let jobs = self.jobs.list().await?;
        Ok(jobs.into_iter().filter(Job::is_open))
    }

    pub async fn list_jobs_by_client(&self, client_id: &str) -> Result<Vec<Job>, MarketError> {
        self.jobs.list_by_client(client_id).await
    }

    pub async fn get_job(&self, id: &str) -> Result<Job, MarketError> {
        self.jobs
            .find_by_id(id)
            .await?
            .ok_or_else(|| MarketError::not_found("Trabajo", id))
    }
}
