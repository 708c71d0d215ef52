//! In-process storage backend.
//!
//! Collections live in memory behind one lock. When opened with a data
//! directory every mutation writes the affected collection through to
//! `<dir>/<key>.json` as a JSON array, and the arrays are reloaded on
//! startup. A mutation reaches memory only after its write succeeded, so a
//! failed call leaves both copies as they were.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::api::application::models::{Application, ApplicationStatus};
use crate::api::auth::models::User;
use crate::api::error::MarketError;
use crate::api::job::models::Job;
use crate::db::repository::{
    ApplicationRepository, JobRepository, Repositories, UserRepository,
};

pub const USERS_KEY: &str = "elcamejob_users";
pub const JOBS_KEY: &str = "elcamejob_jobs";
pub const APPLICATIONS_KEY: &str = "elcamejob_applications";

#[derive(Default)]
struct Collections {
    users: Vec<User>,
    jobs: Vec<Job>,
    applications: Vec<Application>,
}

pub struct LocalStore {
    data_dir: Option<PathBuf>,
    collections: RwLock<Collections>,
}

impl LocalStore {
    /// Store that keeps everything in memory only
    pub fn in_memory() -> Self {
        Self {
            data_dir: None,
            collections: RwLock::new(Collections::default()),
        }
    }

    /// Open a store backed by JSON files in `dir`, loading existing data
    pub async fn open(dir: impl Into<PathBuf>) -> Result<Self, MarketError> {
        let dir = dir.into();
        tokio::fs::create_dir_all(&dir).await?;

        let collections = Collections {
            users: load(&dir, USERS_KEY).await?,
            jobs: load(&dir, JOBS_KEY).await?,
            applications: load(&dir, APPLICATIONS_KEY).await?,
        };
        info!(
            "Local store opened at {}: {} users, {} jobs, {} applications",
            dir.display(),
            collections.users.len(),
            collections.jobs.len(),
            collections.applications.len()
        );

        Ok(Self {
            data_dir: Some(dir),
            collections: RwLock::new(collections),
        })
    }

    /// Wire one shared store into all three repository slots
    pub fn into_repositories(self: Arc<Self>) -> Repositories {
        Repositories {
            users: self.clone(),
            jobs: self.clone(),
            applications: self,
        }
    }

    /// Write `next` through to disk, then make it the in-memory collection
    async fn commit<T: Serialize>(
        &self,
        key: &str,
        slot: &mut Vec<T>,
        next: Vec<T>,
    ) -> Result<(), MarketError> {
        self.persist(key, &next).await?;
        *slot = next;
        Ok(())
    }

    async fn persist<T: Serialize>(&self, key: &str, items: &[T]) -> Result<(), MarketError> {
        let Some(dir) = &self.data_dir else {
            return Ok(());
        };

        // Write to a temp file and rename so readers never see a torn file
        let path = collection_path(dir, key);
        let tmp = dir.join(format!("{key}.json.tmp"));
        let bytes = serde_json::to_vec_pretty(items)?;
        tokio::fs::write(&tmp, bytes).await?;
        tokio::fs::rename(&tmp, &path).await?;

        debug!("Persisted {} records to {}", items.len(), path.display());
        Ok(())
    }
}

fn collection_path(dir: &Path, key: &str) -> PathBuf {
    dir.join(format!("{key}.json"))
}

async fn load<T: DeserializeOwned>(dir: &Path, key: &str) -> Result<Vec<T>, MarketError> {
    match tokio::fs::read(collection_path(dir, key)).await {
        Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(Vec::new()),
        Err(e) => Err(e.into()),
    }
}

#[async_trait]
impl UserRepository for LocalStore {
    async fn insert(&self, user: &User) -> Result<(), MarketError> {
        let mut collections = self.collections.write().await;
        if collections.users.iter().any(|u| u.email == user.email) {
            return Err(MarketError::DuplicateEmail);
        }
        let mut users = collections.users.clone();
        users.push(user.clone());
        self.commit(USERS_KEY, &mut collections.users, users).await
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, MarketError> {
        let collections = self.collections.read().await;
        Ok(collections.users.iter().find(|u| u.email == email).cloned())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<User>, MarketError> {
        let collections = self.collections.read().await;
        Ok(collections.users.iter().find(|u| u.id == id).cloned())
    }

    async fn touch_last_access(&self, id: &str, at: DateTime<Utc>) -> Result<(), MarketError> {
        let mut collections = self.collections.write().await;
        let mut users = collections.users.clone();
        let Some(user) = users.iter_mut().find(|u| u.id == id) else {
            return Ok(());
        };
        user.last_access = at;
        self.commit(USERS_KEY, &mut collections.users, users).await
    }

    async fn count(&self) -> Result<usize, MarketError> {
        Ok(self.collections.read().await.users.len())
    }
}

#[async_trait]
impl JobRepository for LocalStore {
    async fn insert(&self, job: &Job) -> Result<(), MarketError> {
        let mut collections = self.collections.write().await;
        let mut jobs = Vec::with_capacity(collections.jobs.len() + 1);
        jobs.push(job.clone());
        jobs.extend(collections.jobs.iter().cloned());
        self.commit(JOBS_KEY, &mut collections.jobs, jobs).await
    }

    async fn list(&self) -> Result<Vec<Job>, MarketError> {
        Ok(self.collections.read().await.jobs.clone())
    }

    async fn list_by_client(&self, client_id: &str) -> Result<Vec<Job>, MarketError> {
        let collections = self.collections.read().await;
        Ok(collections
            .jobs
            .iter()
            .filter(|j| j.client_id == client_id)
            .cloned()
            .collect())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Job>, MarketError> {
        let collections = self.collections.read().await;
        Ok(collections.jobs.iter().find(|j| j.id == id).cloned())
    }
}

#[async_trait]
impl ApplicationRepository for LocalStore {
    async fn insert(&self, application: &Application) -> Result<(), MarketError> {
        let mut collections = self.collections.write().await;
        let taken = collections
            .applications
            .iter()
            .any(|a| a.job_id == application.job_id && a.worker_id == application.worker_id);
        if taken {
            return Err(MarketError::DuplicateApplication {
                job_id: application.job_id.clone(),
                worker_id: application.worker_id.clone(),
            });
        }
        let mut applications = collections.applications.clone();
        applications.push(application.clone());
        self.commit(APPLICATIONS_KEY, &mut collections.applications, applications)
            .await
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Application>, MarketError> {
        let collections = self.collections.read().await;
        Ok(collections.applications.iter().find(|a| a.id == id).cloned())
    }

    async fn list_by_job(&self, job_id: &str) -> Result<Vec<Application>, MarketError> {
        let collections = self.collections.read().await;
        Ok(collections
            .applications
            .iter()
            .filter(|a| a.job_id == job_id)
            .cloned()
            .collect())
    }

    async fn list_by_worker(&self, worker_id: &str) -> Result<Vec<Application>, MarketError> {
        let collections = self.collections.read().await;
        Ok(collections
            .applications
            .iter()
            .filter(|a| a.worker_id == worker_id)
            .cloned()
            .collect())
    }

    async fn update_status(
        &self,
        id: &str,
        status: ApplicationStatus,
    ) -> Result<Application, MarketError> {
        let mut collections = self.collections.write().await;
        let mut applications = collections.applications.clone();
        let application = applications
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or_else(|| MarketError::not_found("Postulación", id))?;
        application.transition(status)?;
        let updated = application.clone();

        self.commit(APPLICATIONS_KEY, &mut collections.applications, applications)
            .await?;
        Ok(updated)
    }
}
