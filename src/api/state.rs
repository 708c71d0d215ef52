use std::sync::Arc;

use crate::api::application::ApplicationService;
use crate::api::auth::{IdentityService, SessionStore};
use crate::api::dashboard::DashboardService;
use crate::api::job::JobService;
use crate::db::Repositories;

/// Services shared by every HTTP worker
#[derive(Clone)]
pub struct AppState {
    pub identity: IdentityService,
    pub jobs: JobService,
    pub applications: ApplicationService,
    pub dashboard: DashboardService,
}

impl AppState {
    /// Wire the services; `password_cost` is the bcrypt cost for new users.
    pub fn new(
        repositories: Repositories,
        sessions: Arc<SessionStore>,
        password_cost: u32,
    ) -> Self {
        let Repositories {
            users,
            jobs,
            applications,
        } = repositories;

        let identity = IdentityService::new(users, sessions, password_cost);
        let job_service = JobService::new(jobs.clone());
        let application_service = ApplicationService::new(applications, jobs);
        let dashboard = DashboardService::new(job_service.clone(), application_service.clone());

        Self {
            identity,
            jobs: job_service,
            applications: application_service,
            dashboard,
        }
    }
}
