use actix_web::{
    get, post,
    web::{scope, Data, Path, ServiceConfig},
    HttpResponse,
};
use actix_web_validator::Json;

use crate::api::application::dto::{ApplicationListResponse, ApplicationResponse, ApplyRequest};
use crate::api::auth::extractor::Authenticated;
use crate::api::auth::models::Role;
use crate::api::error::MarketError;
use crate::api::state::AppState;
use super::dto::{JobListResponse, JobResponse};
use super::models::NewJob;

#[get("")]
async fn list_open_jobs(state: Data<AppState>) -> Result<HttpResponse, MarketError> {
    let jobs: Vec<_> = state.jobs.list_open_jobs().await?.collect();
    Ok(HttpResponse::Ok().json(JobListResponse::from(jobs)))
}

#[post("")]
async fn create_job(
    state: Data<AppState>,
    auth: Authenticated,
    body: Json<NewJob>,
) -> Result<HttpResponse, MarketError> {
    let job = state.jobs.create_job(body.into_inner(), &auth.user).await?;
    Ok(HttpResponse::Created().json(JobResponse {
        message: "Trabajo publicado exitosamente".to_string(),
        job,
    }))
}

#[get("/{job_id}")]
async fn get_job(state: Data<AppState>, path: Path<String>) -> Result<HttpResponse, MarketError> {
    let job = state.jobs.get_job(&path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(job))
}

#[get("/{job_id}/applications")]
async fn list_job_applications(
    state: Data<AppState>,
    auth: Authenticated,
    path: Path<String>,
) -> Result<HttpResponse, MarketError> {
    let client = auth.require_role(Role::Cliente)?;
    let applications = state
        .dashboard
        .job_applicants(client, &path.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(ApplicationListResponse::from(applications)))
}

#[post("/{job_id}/applications")]
async fn apply_to_job(
    state: Data<AppState>,
    auth: Authenticated,
    path: Path<String>,
    body: Option<Json<ApplyRequest>>,
) -> Result<HttpResponse, MarketError> {
    let message = body.map(|b| b.into_inner().message).unwrap_or_default();
    let application = state
        .applications
        .apply(&path.into_inner(), &auth.user, message)
        .await?;
    Ok(HttpResponse::Created().json(ApplicationResponse {
        message: "Postulación enviada".to_string(),
        application,
    }))
}

pub fn job_config(config: &mut ServiceConfig) {
    config.service(
        scope("jobs")
            .service(list_open_jobs)
            .service(create_job)
            .service(get_job)
            .service(list_job_applications)
            .service(apply_to_job),
    );
}
