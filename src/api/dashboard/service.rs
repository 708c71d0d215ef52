use tracing::{debug, warn};

use crate::api::application::models::{Application, WorkerApplication};
use crate::api::application::service::ApplicationService;
use crate::api::auth::models::PublicUser;
use crate::api::error::MarketError;
use crate::api::job::service::JobService;
use super::dto::ClientJob;

/// Role-specific read views composed from jobs and applications.
///
/// Nothing is cached: every call re-reads the repositories.
#[derive(Clone)]
pub struct DashboardService {
    jobs: JobService,
    applications: ApplicationService,
}

impl DashboardService {
    pub fn new(jobs: JobService, applications: ApplicationService) -> Self {
        Self { jobs, applications }
    }

    /// A client's jobs with how many applications each received
    pub async fn client_jobs(&self, client_id: &str) -> Result<Vec<ClientJob>, MarketError> {
        let jobs = self.jobs.list_jobs_by_client(client_id).await?;
        debug!("Dashboard: {} jobs for client {}", jobs.len(), client_id);

        let mut views = Vec::with_capacity(jobs.len());
        for job in jobs {
            let applicant_count = self
                .applications
                .list_applications_for_job(&job.id)
                .await?
                .len();
            views.push(ClientJob {
                job,
                applicant_count,
            });
        }
        Ok(views)
    }

    /// A worker's applications with the title of each job
    pub async fn worker_applications(
        &self,
        worker_id: &str,
    ) -> Result<Vec<WorkerApplication>, MarketError> {
        self.applications.list_applications_for_worker(worker_id).await
    }

    /// Applicants for a job, visible only to the client who posted it
    pub async fn job_applicants(
        &self,
        actor: &PublicUser,
        job_id: &str,
    ) -> Result<Vec<Application>, MarketError> {
        let job = self.jobs.get_job(job_id).await?;
        if job.client_id != actor.id {
            warn!(
                "Dashboard: User {} asked for applicants of job {} owned by {}",
                actor.id, job.id, job.client_id
            );
            return Err(MarketError::forbidden("el trabajo pertenece a otro cliente"));
        }
        self.applications.list_applications_for_job(job_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use chrono::Utc;

    use crate::api::auth::models::Profile;
    use crate::api::job::models::NewJob;
    use crate::db::local::LocalStore;

    fn user(id: &str, profile: Profile) -> PublicUser {
        PublicUser {
            id: id.into(),
            nombres: format!("Usuario {id}"),
            cedula: "12345678".into(),
            email: format!("{id}@x.com"),
            profile,
            registration_date: Utc::now(),
        }
    }

    fn client(id: &str) -> PublicUser {
        user(
            id,
            Profile::Cliente {
                direccion: String::new(),
                telefono: String::new(),
            },
        )
    }

    fn worker(id: &str) -> PublicUser {
        user(
            id,
            Profile::Trabajador {
                cargo: String::new(),
                departamento: String::new(),
            },
        )
    }

    fn titled(title: &str) -> NewJob {
        NewJob {
            title: Some(title.into()),
            ..NewJob::default()
        }
    }

    fn services() -> (JobService, ApplicationService, DashboardService) {
        let store = Arc::new(LocalStore::in_memory());
        let jobs = JobService::new(store.clone());
        let applications = ApplicationService::new(store.clone(), store);
        let dashboard = DashboardService::new(jobs.clone(), applications.clone());
        (jobs, applications, dashboard)
    }

    #[tokio::test]
    async fn client_jobs_count_applicants() {
        let (jobs, applications, dashboard) = services();
        let owner = client("c1");
        let busy = jobs
            .create_job(titled("ocupado"), &owner)
            .await
            .expect("created");
        let quiet = jobs
            .create_job(titled("tranquilo"), &owner)
            .await
            .expect("created");
        applications
            .apply(&busy.id, &worker("w1"), "uno")
            .await
            .expect("applies");
        applications
            .apply(&busy.id, &worker("w2"), "dos")
            .await
            .expect("applies");

        let views = dashboard.client_jobs("c1").await.expect("listed");

        let counts: Vec<(String, usize)> = views
            .into_iter()
            .map(|v| (v.job.id, v.applicant_count))
            .collect();
        assert_eq!(counts, vec![(quiet.id, 0), (busy.id, 2)]);
    }

    #[tokio::test]
    async fn applicants_are_hidden_from_other_users() {
        let (jobs, applications, dashboard) = services();
        let owner = client("c1");
        let job = jobs
            .create_job(NewJob::default(), &owner)
            .await
            .expect("created");
        applications
            .apply(&job.id, &worker("w1"), "uno")
            .await
            .expect("applies");

        let err = dashboard
            .job_applicants(&client("c2"), &job.id)
            .await
            .unwrap_err();
        assert!(matches!(err, MarketError::Forbidden(_)));

        let err = dashboard
            .job_applicants(&worker("w1"), &job.id)
            .await
            .unwrap_err();
        assert!(matches!(err, MarketError::Forbidden(_)));

        let visible = dashboard
            .job_applicants(&owner, &job.id)
            .await
            .expect("owner sees");
        assert_eq!(visible.len(), 1);
    }
}
