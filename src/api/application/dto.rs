use serde::{Deserialize, Serialize};
use validator::Validate;

use super::models::{Application, ApplicationStatus};

/// Payload for applying to a job
#[derive(Deserialize, Debug, Default, Validate)]
pub struct ApplyRequest {
    #[serde(default)]
    pub message: String,
}

/// Payload for deciding on an application
#[derive(Deserialize, Debug, Validate)]
pub struct StatusUpdateRequest {
    pub status: ApplicationStatus,
}

/// Response for application creation or update
#[derive(Serialize)]
pub struct ApplicationResponse {
    pub message: String,
    pub application: Application,
}

/// Response for application listings
#[derive(Serialize)]
pub struct ApplicationListResponse<T> {
    pub total: usize,
    pub applications: Vec<T>,
}

impl<T> From<Vec<T>> for ApplicationListResponse<T> {
    fn from(applications: Vec<T>) -> Self {
        Self {
            total: applications.len(),
            applications,
        }
    }
}
