use actix_web::{
    get,
    web::{scope, Data, ServiceConfig},
    HttpResponse,
};

use crate::api::application::dto::ApplicationListResponse;
use crate::api::auth::extractor::Authenticated;
use crate::api::auth::models::Role;
use crate::api::error::MarketError;
use crate::api::state::AppState;

/// Jobs posted by the calling client, with applicant counts
#[get("/jobs")]
async fn my_jobs(state: Data<AppState>, auth: Authenticated) -> Result<HttpResponse, MarketError> {
    let client = auth.require_role(Role::Cliente)?;
    let jobs = state.dashboard.client_jobs(&client.id).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "total": jobs.len(), "jobs": jobs })))
}

/// Applications sent by the calling worker, with job titles
#[get("/applications")]
async fn my_applications(
    state: Data<AppState>,
    auth: Authenticated,
) -> Result<HttpResponse, MarketError> {
    let worker = auth.require_role(Role::Trabajador)?;
    let applications = state.dashboard.worker_applications(&worker.id).await?;
    Ok(HttpResponse::Ok().json(ApplicationListResponse::from(applications)))
}

pub fn dashboard_config(config: &mut ServiceConfig) {
    config.service(scope("me").service(my_jobs).service(my_applications));
}
