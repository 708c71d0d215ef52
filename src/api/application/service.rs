use std::collections::HashMap;
use std::sync::Arc;

use tracing::{info, warn};

use crate::api::auth::models::{PublicUser, Role};
use crate::api::error::MarketError;
use crate::db::repository::{ApplicationRepository, JobRepository};
use super::models::{Application, ApplicationStatus, WorkerApplication, MISSING_JOB_TITLE};

/// Applications and their status lifecycle
#[derive(Clone)]
pub struct ApplicationService {
    applications: Arc<dyn ApplicationRepository>,
    jobs: Arc<dyn JobRepository>,
}

impl ApplicationService {
    pub fn new(applications: Arc<dyn ApplicationRepository>, jobs: Arc<dyn JobRepository>) -> Self {
        Self { applications, jobs }
    }

    /// Apply to a job as a worker
    ///
    /// # Returns
    /// - `Ok(Application)` - stored as PENDIENTE
    /// - `Err(MarketError::Forbidden)` - caller is not a worker
    /// - `Err(MarketError::NotFound)` - job does not exist
    /// - `Err(MarketError::DuplicateApplication)` - already applied
    pub async fn apply(
        &self,
        job_id: &str,
        worker: &PublicUser,
        message: impl Into<String>,
    ) -> Result<Application, MarketError> {
        if worker.role() != Role::Trabajador {
            warn!("Service: User {} tried to apply as {}", worker.id, worker.role());
            return Err(MarketError::forbidden("solo los trabajadores pueden postularse"));
        }

        // Existence is the only requirement; the job's status is not checked
        if self.jobs.find_by_id(job_id).await?.is_none() {
            return Err(MarketError::not_found("Trabajo", job_id));
        }

        let application = Application::new(job_id, worker, message.into());
        self.applications.insert(&application).await?;

        info!(
            "Service: Worker {} applied to job {} (application id={})",
            worker.id, job_id, application.id
        );
        Ok(application)
    }

    pub async fn list_applications_for_job(
        &self,
        job_id: &str,
    ) -> Result<Vec<Application>, MarketError> {
        self.applications.list_by_job(job_id).await
    }

    /// A worker's applications, each joined with its job title
    pub async fn list_applications_for_worker(
        &self,
        worker_id: &str,
    ) -> Result<Vec<WorkerApplication>, MarketError> {
        let applications = self.applications.list_by_worker(worker_id).await?;
        let jobs = self.jobs.list().await?;
        let titles: HashMap<&str, &str> = jobs
            .iter()
            .map(|job| (job.id.as_str(), job.title.as_str()))
            .collect();

        Ok(applications
            .into_iter()
            .map(|application| {
                let job_title = titles
                    .get(application.job_id.as_str())
                    .copied()
                    .unwrap_or(MISSING_JOB_TITLE)
                    .to_string();
                WorkerApplication {
                    application,
                    job_title,
                }
            })
            .collect())
    }

    /// Record a decision on a pending application
    ///
    /// Unknown ids fail with `NotFound`; anything other than
    /// PENDIENTE -> ACEPTADA | RECHAZADA fails with `InvalidTransition`.
    pub async fn update_status(
        &self,
        application_id: &str,
        new_status: ApplicationStatus,
    ) -> Result<Application, MarketError> {
        let updated = self
            .applications
            .update_status(application_id, new_status)
            .await?;

        info!("Service: Application {} is now {}", updated.id, updated.status);
        Ok(updated)
    }

    /// `update_status` restricted to the client who owns the job
    pub async fn decide(
        &self,
        actor: &PublicUser,
        application_id: &str,
        new_status: ApplicationStatus,
    ) -> Result<Application, MarketError> {
        if actor.role() != Role::Cliente {
            return Err(MarketError::forbidden("solo el cliente dueño del trabajo decide"));
        }

        let application = self
            .applications
            .find_by_id(application_id)
            .await?
            .ok_or_else(|| MarketError::not_found("Postulación", application_id))?;
        let job = self
            .jobs
            .find_by_id(&application.job_id)
            .await?
            .ok_or_else(|| MarketError::not_found("Trabajo", &application.job_id))?;

        if job.client_id != actor.id {
            warn!(
                "Service: Client {} tried to decide application {} on job {} owned by {}",
                actor.id, application_id, job.id, job.client_id
            );
            return Err(MarketError::forbidden("el trabajo pertenece a otro cliente"));
        }

        self.update_status(application_id, new_status).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::auth::models::Profile;
    use crate::api::job::models::{Job, JobStatus, NewJob};
    use crate::db::local::LocalStore;
    use chrono::Utc;
    use rstest::{fixture, rstest};

    struct Fixture {
        store: Arc<LocalStore>,
        service: ApplicationService,
        client: PublicUser,
        worker: PublicUser,
        job: Job,
    }

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

    #[fixture]
    async fn setup() -> Fixture {
        let store = Arc::new(LocalStore::in_memory());
        let service = ApplicationService::new(store.clone(), store.clone());
        let client = client("c1");
        let job = Job::new(
            NewJob {
                title: Some("Instalación de ventiladores".into()),
                budget: 50000.0,
                ..NewJob::default()
            },
            &client,
        );
        JobRepository::insert(store.as_ref(), &job).await.expect("job stored");

        Fixture {
            store,
            service,
            client,
            worker: worker("w1"),
            job,
        }
    }

    #[rstest]
    #[tokio::test]
    async fn applying_twice_keeps_one_record(#[future] setup: Fixture) {
        let f = setup.await;

        f.service.apply(&f.job.id, &f.worker, "hi").await.expect("applies");
        let err = f.service.apply(&f.job.id, &f.worker, "hi again").await.unwrap_err();

        assert!(matches!(err, MarketError::DuplicateApplication { .. }));
        let apps = f.service.list_applications_for_job(&f.job.id).await.expect("listed");
        assert_eq!(apps.len(), 1);
        assert_eq!(apps[0].message, "hi");
        assert_eq!(apps[0].status, ApplicationStatus::Pendiente);
    }

    #[rstest]
    #[tokio::test]
    async fn clients_cannot_apply(#[future] setup: Fixture) {
        let f = setup.await;
        let err = f.service.apply(&f.job.id, &f.client, "yo").await.unwrap_err();
        assert!(matches!(err, MarketError::Forbidden(_)));
    }

    #[rstest]
    #[tokio::test]
    async fn applying_to_unknown_job_fails(#[future] setup: Fixture) {
        let f = setup.await;
        let err = f.service.apply("missing", &f.worker, "hola").await.unwrap_err();
        assert!(matches!(err, MarketError::NotFound { .. }));
    }

    #[rstest]
    #[tokio::test]
    async fn applying_to_in_progress_job_is_accepted(#[future] setup: Fixture) {
        let f = setup.await;
        let mut in_progress = Job::new(NewJob::default(), &f.client);
        in_progress.status = JobStatus::EnProceso;
        JobRepository::insert(f.store.as_ref(), &in_progress).await.expect("job stored");

        let app = f.service.apply(&in_progress.id, &f.worker, "hola").await.expect("applies");
        assert_eq!(app.status, ApplicationStatus::Pendiente);
        assert_eq!(app.job_id, in_progress.id);
    }

    #[rstest]
    #[tokio::test]
    async fn accepting_one_leaves_the_others_alone(#[future] setup: Fixture) {
        let f = setup.await;
        let first = f.service.apply(&f.job.id, &worker("w1"), "uno").await.expect("applies");
        let second = f.service.apply(&f.job.id, &worker("w2"), "dos").await.expect("applies");

        f.service
            .update_status(&first.id, ApplicationStatus::Aceptada)
            .await
            .expect("accepted");

        let apps = f.service.list_applications_for_job(&f.job.id).await.expect("listed");
        let status_of = |id: &str| {
            apps.iter()
                .find(|a| a.id == id)
                .map(|a| a.status)
                .expect("application present")
        };
        assert_eq!(status_of(&first.id), ApplicationStatus::Aceptada);
        assert_eq!(status_of(&second.id), ApplicationStatus::Pendiente);
    }

    #[rstest]
    #[tokio::test]
    async fn update_status_reports_unknown_ids(#[future] setup: Fixture) {
        let f = setup.await;
        let err = f
            .service
            .update_status("missing", ApplicationStatus::Aceptada)
            .await
            .unwrap_err();
        assert!(matches!(err, MarketError::NotFound { .. }));
    }

    #[rstest]
    #[case(ApplicationStatus::Pendiente)]
    #[tokio::test]
    async fn update_status_rejects_non_decisions(
        #[future] setup: Fixture,
        #[case] status: ApplicationStatus,
    ) {
        let f = setup.await;
        let app = f.service.apply(&f.job.id, &f.worker, "hola").await.expect("applies");

        let err = f.service.update_status(&app.id, status).await.unwrap_err();
        assert!(matches!(err, MarketError::InvalidTransition { .. }));
    }

    #[rstest]
    #[tokio::test]
    async fn only_the_owning_client_decides(#[future] setup: Fixture) {
        let f = setup.await;
        let app = f.service.apply(&f.job.id, &f.worker, "hola").await.expect("applies");

        let stranger = f
            .service
            .decide(&client("c2"), &app.id, ApplicationStatus::Aceptada)
            .await
            .unwrap_err();
        assert!(matches!(stranger, MarketError::Forbidden(_)));

        let by_worker = f
            .service
            .decide(&f.worker, &app.id, ApplicationStatus::Aceptada)
            .await
            .unwrap_err();
        assert!(matches!(by_worker, MarketError::Forbidden(_)));

        let decided = f
            .service
            .decide(&f.client, &app.id, ApplicationStatus::Rechazada)
            .await
            .expect("owner decides");
        assert_eq!(decided.status, ApplicationStatus::Rechazada);

        let again = f
            .service
            .decide(&f.client, &app.id, ApplicationStatus::Aceptada)
            .await
            .unwrap_err();
        assert!(matches!(again, MarketError::InvalidTransition { .. }));
    }

    #[rstest]
    #[tokio::test]
    async fn worker_view_uses_sentinel_for_missing_jobs(#[future] setup: Fixture) {
        let f = setup.await;
        f.service.apply(&f.job.id, &f.worker, "hola").await.expect("applies");
        let orphan = Application::new("job_borrado", &f.worker, "viejo".into());
        ApplicationRepository::insert(f.store.as_ref(), &orphan)
            .await
            .expect("stored");

        let views = f
            .service
            .list_applications_for_worker(&f.worker.id)
            .await
            .expect("listed");

        let titles: Vec<&str> = views.iter().map(|v| v.job_title.as_str()).collect();
        assert_eq!(titles, vec!["Instalación de ventiladores", MISSING_JOB_TITLE]);
    }
}
