use serde::Serialize;

use super::models::Job;

/// Response for single job creation
#[derive(Serialize)]
pub struct JobResponse {
    pub message: String,
    pub job: Job,
}

/// Response for job listings
#[derive(Serialize)]
pub struct JobListResponse {
    pub total: usize,
    pub jobs: Vec<Job>,
}

impl From<Vec<Job>> for JobListResponse {
    fn from(jobs: Vec<Job>) -> Self {
        Self {
            total: jobs.len(),
            jobs,
        }
    }
}
