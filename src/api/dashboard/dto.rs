use serde::Serialize;

use crate::api::job::models::Job;

/// A client's job together with its number of applicants
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientJob {
    #[serde(flatten)]
    pub job: Job,
    pub applicant_count: usize,
}
